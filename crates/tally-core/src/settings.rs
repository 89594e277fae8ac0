use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

use crate::error::{Result, TallyError};

// ── Tool ───────────────────────────────────────────────────────────────────────

/// Which of the bundled tools the UI opens with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tool {
    /// Email date-distribution analyzer.
    Analyzer,
    /// Quantum measurement demo.
    Quantum,
    /// Random point cloud in four or five dimensions.
    Cloud,
}

impl Tool {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tool::Analyzer => "analyzer",
            Tool::Quantum => "quantum",
            Tool::Cloud => "cloud",
        }
    }
}

// ── Settings (CLI) ─────────────────────────────────────────────────────────────

/// Email date histograms and quantum demos in the terminal
#[derive(Parser, Debug, Clone)]
#[command(
    name = "tally",
    about = "Email date histograms and quantum demos in the terminal",
    version
)]
pub struct Settings {
    /// Tool to open on start-up
    #[arg(long, default_value = "analyzer", value_parser = ["analyzer", "quantum", "cloud"])]
    pub tool: String,

    /// Display theme
    #[arg(long, default_value = "auto", value_parser = ["light", "dark", "classic", "auto"])]
    pub theme: String,

    /// Pre-select an email text file (the graph is still generated on demand)
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// Seed for the measurement and point-cloud random sources (random when omitted)
    #[arg(long)]
    pub seed: Option<u64>,

    /// Dimensions of the point cloud (1-5)
    #[arg(long, default_value = "4", value_parser = clap::value_parser!(u32).range(1..=5))]
    pub dimensions: u32,

    /// Months averaged by the trend line (odd, 1-11)
    #[arg(long, default_value = "3", value_parser = clap::value_parser!(u32).range(1..=11))]
    pub trend_window: u32,

    /// Logging level
    #[arg(long, default_value = "INFO", value_parser = ["DEBUG", "INFO", "WARNING", "ERROR"])]
    pub log_level: String,

    /// Log file path (defaults to ~/.tally/logs/tally.log)
    #[arg(long)]
    pub log_file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Settings {
    /// Parse the process arguments. Exits with clap's usage message on error.
    pub fn load() -> Self {
        Self::resolve(Settings::parse())
    }

    /// Parse an explicit argument list (first item is the binary name).
    pub fn from_args<I, T>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let settings =
            Settings::try_parse_from(args).map_err(|e| TallyError::Config(e.to_string()))?;
        Ok(Self::resolve(settings))
    }

    /// The start-up tool as an enum.
    pub fn tool(&self) -> Tool {
        match self.tool.as_str() {
            "quantum" => Tool::Quantum,
            "cloud" => Tool::Cloud,
            _ => Tool::Analyzer,
        }
    }

    /// Apply `--debug` and force an odd trend window so it stays centered.
    fn resolve(mut settings: Settings) -> Settings {
        if settings.debug {
            settings.log_level = "DEBUG".to_string();
        }
        if settings.trend_window % 2 == 0 {
            settings.trend_window += 1;
        }
        settings
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_default_values() {
        let settings = Settings::from_args(["tally"]).unwrap();

        assert_eq!(settings.tool, "analyzer");
        assert_eq!(settings.tool(), Tool::Analyzer);
        assert_eq!(settings.theme, "auto");
        assert!(settings.file.is_none());
        assert!(settings.seed.is_none());
        assert_eq!(settings.trend_window, 3);
        assert_eq!(settings.dimensions, 4);
        assert_eq!(settings.log_level, "INFO");
        assert!(settings.log_file.is_none());
        assert!(!settings.debug);
    }

    #[test]
    fn test_settings_cli_quantum_tool() {
        let settings = Settings::from_args(["tally", "--tool", "quantum"]).unwrap();
        assert_eq!(settings.tool(), Tool::Quantum);
        assert_eq!(settings.tool().as_str(), "quantum");
    }

    #[test]
    fn test_settings_cli_cloud_tool_and_dimensions() {
        let settings =
            Settings::from_args(["tally", "--tool", "cloud", "--dimensions", "5"]).unwrap();
        assert_eq!(settings.tool(), Tool::Cloud);
        assert_eq!(settings.tool().as_str(), "cloud");
        assert_eq!(settings.dimensions, 5);
    }

    #[test]
    fn test_settings_dimensions_out_of_range() {
        assert!(Settings::from_args(["tally", "--dimensions", "0"]).is_err());
        assert!(Settings::from_args(["tally", "--dimensions", "6"]).is_err());
    }

    #[test]
    fn test_settings_cli_rejects_unknown_tool() {
        let err = Settings::from_args(["tally", "--tool", "spreadsheet"]).unwrap_err();
        assert!(matches!(err, TallyError::Config(_)));
    }

    #[test]
    fn test_settings_cli_file_and_seed() {
        let settings =
            Settings::from_args(["tally", "--file", "/tmp/inbox.txt", "--seed", "42"]).unwrap();
        assert_eq!(settings.file, Some(PathBuf::from("/tmp/inbox.txt")));
        assert_eq!(settings.seed, Some(42));
    }

    #[test]
    fn test_settings_debug_overrides_log_level() {
        let settings = Settings::from_args(["tally", "--log-level", "ERROR", "--debug"]).unwrap();
        assert_eq!(settings.log_level, "DEBUG");
    }

    #[test]
    fn test_settings_even_trend_window_is_made_odd() {
        let settings = Settings::from_args(["tally", "--trend-window", "4"]).unwrap();
        assert_eq!(settings.trend_window, 5);
    }

    #[test]
    fn test_settings_trend_window_out_of_range() {
        assert!(Settings::from_args(["tally", "--trend-window", "0"]).is_err());
        assert!(Settings::from_args(["tally", "--trend-window", "12"]).is_err());
    }

    #[test]
    fn test_settings_cli_log_file() {
        let settings = Settings::from_args(["tally", "--log-file", "/tmp/tally.log"]).unwrap();
        assert_eq!(settings.log_file, Some(PathBuf::from("/tmp/tally.log")));
    }
}
