//! Data ingestion layer for Tally.
//!
//! Responsible for reading an exported mailbox text file, splitting it into
//! email records, extracting each record's `Date` header, aggregating dates
//! into gap-filled monthly buckets and running the top-level analysis
//! pipeline.

pub mod aggregator;
pub mod analysis;
pub mod extractor;
pub mod loader;
pub mod splitter;

pub use analysis::{analyze_file, analyze_text, AnalysisMetadata, EmailReport};
pub use tally_core as core;
