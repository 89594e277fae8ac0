//! Shared building blocks for the tally tools.
//!
//! Error taxonomy, command-line settings, the month-bucket chart model and
//! display formatting helpers used by the data, quantum and UI crates.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;

pub use error::{InputField, Result, TallyError};
pub use models::{MonthBucket, MonthKey, MonthlySeries};
