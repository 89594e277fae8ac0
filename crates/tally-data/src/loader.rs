//! Email text file loading.
//!
//! Reads a locally exported mailbox text file into memory in one piece.

use std::path::Path;

use tally_core::{Result, TallyError};
use tracing::{debug, warn};

/// Read the whole file at `path` into a `String`.
///
/// Bytes that are not valid UTF-8 are replaced rather than rejected, so a
/// mailbox exported in a legacy encoding still yields its ASCII headers.
/// Missing, unreadable and directory paths fail with
/// [`TallyError::FileAccess`].
pub fn load_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|source| {
        warn!("Failed to read file {}: {}", path.display(), source);
        TallyError::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    })?;

    let text = match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            warn!(
                "{} is not valid UTF-8 (first bad byte at {}); decoding lossily",
                path.display(),
                e.utf8_error().valid_up_to()
            );
            String::from_utf8_lossy(e.as_bytes()).into_owned()
        }
    };

    debug!("Loaded {} bytes from {}", text.len(), path.display());
    Ok(text)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{NamedTempFile, TempDir};

    #[test]
    fn test_load_text_reads_whole_file() {
        let mut file = NamedTempFile::new().expect("tempfile");
        write!(file, "Date: Mon, 5 Jun 2023 14:02:00 +0000\n\nbody\n").unwrap();

        let text = load_text(file.path()).expect("load");
        assert_eq!(text, "Date: Mon, 5 Jun 2023 14:02:00 +0000\n\nbody\n");
    }

    #[test]
    fn test_load_text_missing_file_is_file_access_error() {
        let tmp = TempDir::new().expect("tempdir");
        let missing = tmp.path().join("nope.txt");

        let err = load_text(&missing).unwrap_err();
        match err {
            TallyError::FileAccess { path, .. } => assert_eq!(path, missing),
            other => panic!("expected FileAccess, got {other:?}"),
        }
    }

    #[test]
    fn test_load_text_directory_is_file_access_error() {
        let tmp = TempDir::new().expect("tempdir");
        let err = load_text(tmp.path()).unwrap_err();
        assert!(matches!(err, TallyError::FileAccess { .. }));
    }

    #[test]
    fn test_load_text_invalid_utf8_is_lossy() {
        let mut file = NamedTempFile::new().expect("tempfile");
        file.write_all(b"Date: Tue, 6 Jun 2023 09:00:00 +0000\nSubject: caf\xe9\n")
            .unwrap();

        let text = load_text(file.path()).expect("load");
        assert!(text.starts_with("Date: Tue, 6 Jun 2023"));
        assert!(text.contains('\u{FFFD}'));
    }

    #[test]
    fn test_load_text_empty_file() {
        let file = NamedTempFile::new().expect("tempfile");
        assert_eq!(load_text(file.path()).expect("load"), "");
    }
}
