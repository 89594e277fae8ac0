use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Quantum-demo input field that an [`TallyError::InvalidInput`] refers to.
///
/// The UI uses this to place the message directly under the offending field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    States,
    Amplitudes,
    Trials,
}

impl fmt::Display for InputField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            InputField::States => "states",
            InputField::Amplitudes => "amplitudes",
            InputField::Trials => "trials",
        };
        f.write_str(name)
    }
}

/// All errors produced by the tally tools.
#[derive(Error, Debug)]
pub enum TallyError {
    /// The selected file is missing or could not be read.
    #[error("Failed to read file {path}: {source}")]
    FileAccess {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// No record in the input carried a usable `Date` header.
    #[error("No valid dates found ({records} records, {skipped} skipped)")]
    EmptyResult { records: usize, skipped: usize },

    /// Quantum-demo input rejected before any simulation ran.
    #[error("Invalid {field}: {message}")]
    InvalidInput { field: InputField, message: String },

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl TallyError {
    /// Shorthand for an [`TallyError::InvalidInput`] on `field`.
    pub fn invalid(field: InputField, message: impl Into<String>) -> Self {
        TallyError::InvalidInput {
            field,
            message: message.into(),
        }
    }

    /// The input field this error should be reported next to, if any.
    pub fn field(&self) -> Option<InputField> {
        match self {
            TallyError::InvalidInput { field, .. } => Some(*field),
            _ => None,
        }
    }
}

/// Convenience alias used throughout the tally crates.
pub type Result<T> = std::result::Result<T, TallyError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_file_access() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = TallyError::FileAccess {
            path: PathBuf::from("/mail/inbox.txt"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/mail/inbox.txt"));
        assert!(msg.contains("no such file"));
    }

    #[test]
    fn test_error_display_empty_result() {
        let err = TallyError::EmptyResult {
            records: 4,
            skipped: 4,
        };
        assert_eq!(
            err.to_string(),
            "No valid dates found (4 records, 4 skipped)"
        );
    }

    #[test]
    fn test_error_display_invalid_input() {
        let err = TallyError::invalid(InputField::Amplitudes, "all amplitudes are zero");
        assert_eq!(err.to_string(), "Invalid amplitudes: all amplitudes are zero");
        assert_eq!(err.field(), Some(InputField::Amplitudes));
    }

    #[test]
    fn test_field_is_none_for_other_variants() {
        let err = TallyError::Config("bad theme".to_string());
        assert_eq!(err.field(), None);
        assert_eq!(err.to_string(), "Configuration error: bad theme");
    }
}
