use std::fs::{self, File, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

// ── Directory bootstrap ────────────────────────────────────────────────────────

/// Root of the application's own files, `~/.tally/`.
pub fn tally_home() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".tally")
}

/// Default log destination, `~/.tally/logs/tally.log`.
pub fn default_log_file() -> PathBuf {
    tally_home().join("logs").join("tally.log")
}

/// Ensure `~/.tally/` and `~/.tally/logs/` exist.
pub fn ensure_directories() -> anyhow::Result<()> {
    fs::create_dir_all(tally_home().join("logs"))?;
    Ok(())
}

// ── Logging bootstrap ──────────────────────────────────────────────────────────

/// Map a `--log-level` name to a tracing filter directive.
pub fn level_directive(log_level: &str) -> &'static str {
    match log_level.to_uppercase().as_str() {
        "DEBUG" => "debug",
        "WARNING" | "WARN" => "warn",
        "ERROR" => "error",
        _ => "info",
    }
}

/// Open `path` for appending, creating missing parent directories.
fn open_log_file(path: &Path) -> anyhow::Result<File> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    Ok(OpenOptions::new().create(true).append(true).open(path)?)
}

/// Initialise the global `tracing` subscriber.
///
/// The terminal belongs to the TUI, so events go to `log_file` (default
/// `~/.tally/logs/tally.log`) without ANSI colours. `RUST_LOG` overrides
/// `log_level` when set.
pub fn setup_logging(log_level: &str, log_file: Option<&Path>) -> anyhow::Result<()> {
    let path = log_file
        .map(Path::to_path_buf)
        .unwrap_or_else(default_log_file);
    let file = open_log_file(&path)?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_directive(log_level)));

    let layer = fmt::layer()
        .with_target(false)
        .with_thread_ids(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file));

    tracing_subscriber::registry()
        .with(filter)
        .with(layer)
        .try_init()?;

    Ok(())
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn with_home<T>(home: &Path, f: impl FnOnce() -> T) -> T {
        let original_home = std::env::var_os("HOME");
        std::env::set_var("HOME", home);
        let result = f();
        match original_home {
            Some(v) => std::env::set_var("HOME", v),
            None => std::env::remove_var("HOME"),
        }
        result
    }

    #[test]
    fn test_ensure_directories_and_default_log_file() {
        let tmp = TempDir::new().expect("tempdir");

        let (result, log_file) = with_home(tmp.path(), || (ensure_directories(), default_log_file()));
        result.expect("ensure_directories should succeed");

        let home = tmp.path().join(".tally");
        assert!(home.is_dir(), ".tally dir must exist");
        assert!(home.join("logs").is_dir(), "logs subdir must exist");
        assert_eq!(log_file, home.join("logs").join("tally.log"));
    }

    #[test]
    fn test_level_directive_mapping() {
        assert_eq!(level_directive("DEBUG"), "debug");
        assert_eq!(level_directive("info"), "info");
        assert_eq!(level_directive("WARNING"), "warn");
        assert_eq!(level_directive("ERROR"), "error");
        assert_eq!(level_directive("verbose"), "info");
    }

    #[test]
    fn test_open_log_file_creates_parents_and_appends() {
        let tmp = TempDir::new().expect("tempdir");
        let path = tmp.path().join("nested").join("dir").join("tally.log");

        {
            use std::io::Write;
            let mut f = open_log_file(&path).expect("open");
            writeln!(f, "first").unwrap();
            let mut f = open_log_file(&path).expect("reopen");
            writeln!(f, "second").unwrap();
        }

        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "first\nsecond\n");
    }
}
