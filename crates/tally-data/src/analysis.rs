//! End-to-end email date analysis.
//!
//! Orchestrates loading, record splitting, date extraction and monthly
//! aggregation, returning an [`EmailReport`] ready for the UI layer.

use std::path::Path;

use tally_core::models::MonthlySeries;
use tally_core::{Result, TallyError};
use tracing::{debug, warn};

use crate::aggregator::MonthAggregator;
use crate::extractor::extract_date;
use crate::loader::load_text;
use crate::splitter::split_records;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the monthly series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisMetadata {
    /// Number of records the splitter produced.
    pub records: usize,
    /// Records that yielded a date.
    pub parsed: usize,
    /// Records without a usable `Date` header.
    pub skipped: usize,
    /// Wall-clock seconds spent reading the file (zero for in-memory text).
    pub load_time_seconds: f64,
    /// Wall-clock seconds spent splitting, extracting and aggregating.
    pub transform_time_seconds: f64,
}

/// The complete output of [`analyze_file`] / [`analyze_text`].
#[derive(Debug, Clone, PartialEq)]
pub struct EmailReport {
    /// Gap-filled monthly counts plus the average.
    pub series: MonthlySeries,
    pub metadata: AnalysisMetadata,
}

impl EmailReport {
    pub fn records(&self) -> usize {
        self.metadata.records
    }

    pub fn parsed(&self) -> usize {
        self.metadata.parsed
    }

    pub fn skipped(&self) -> usize {
        self.metadata.skipped
    }
}

// ── Public functions ──────────────────────────────────────────────────────────

/// Run the full pipeline on the file at `path`.
///
/// 1. Load the file ([`TallyError::FileAccess`] aborts before parsing).
/// 2. Split, extract and aggregate via [`analyze_text`].
pub fn analyze_file(path: &Path) -> Result<EmailReport> {
    let load_start = std::time::Instant::now();
    let text = load_text(path)?;
    let load_time = load_start.elapsed().as_secs_f64();

    let mut report = analyze_text(&text)?;
    report.metadata.load_time_seconds = load_time;
    Ok(report)
}

/// Run split, extract and aggregate over already-loaded `text`.
///
/// Records without a usable date are counted as skipped, never dropped
/// silently. When no record yields a date the run fails with
/// [`TallyError::EmptyResult`] carrying both counts.
pub fn analyze_text(text: &str) -> Result<EmailReport> {
    let transform_start = std::time::Instant::now();

    let mut records = 0usize;
    let mut skipped = 0usize;
    let mut dates = Vec::new();

    for (index, record) in split_records(text).enumerate() {
        records += 1;
        match extract_date(&record) {
            Ok(date) => dates.push(date),
            Err(reason) => {
                skipped += 1;
                warn!("Skipping record {}: {}", index + 1, reason);
            }
        }
    }

    let parsed = dates.len();
    debug!(
        "Split {} records: {} parsed, {} skipped",
        records, parsed, skipped
    );

    if parsed == 0 {
        return Err(TallyError::EmptyResult { records, skipped });
    }

    let series = MonthAggregator::aggregate(dates);
    let transform_time = transform_start.elapsed().as_secs_f64();

    Ok(EmailReport {
        series,
        metadata: AnalysisMetadata {
            records,
            parsed,
            skipped,
            load_time_seconds: 0.0,
            transform_time_seconds: transform_time,
        },
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_add_up() {
        let text = "Date: Mon, 5 Jun 2023 14:02:00 +0000\n\n\
                    Subject: no date here\n\n\
                    Date: not a date\n\n\
                    Date: Tue, 6 Jun 2023 09:00:00 +0000\n";
        let report = analyze_text(text).expect("report");

        assert_eq!(report.records(), 4);
        assert_eq!(report.parsed(), 2);
        assert_eq!(report.skipped(), 2);
        assert_eq!(report.parsed() + report.skipped(), report.records());
    }

    #[test]
    fn test_no_usable_dates_is_empty_result() {
        let err = analyze_text("Subject: a\n\nDate: never\n").unwrap_err();
        match err {
            TallyError::EmptyResult { records, skipped } => {
                assert_eq!(records, 2);
                assert_eq!(skipped, 2);
            }
            other => panic!("expected EmptyResult, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_text_is_empty_result() {
        assert!(matches!(
            analyze_text(""),
            Err(TallyError::EmptyResult {
                records: 0,
                skipped: 0
            })
        ));
    }

    #[test]
    fn test_rerun_gives_same_report_series() {
        let text = "Date: 1 Jan 2023\n\nDate: 1 Mar 2023\n";
        let a = analyze_text(text).expect("first");
        let b = analyze_text(text).expect("second");
        assert_eq!(a.series, b.series);
        assert_eq!(a.series.len(), 3);
    }
}
