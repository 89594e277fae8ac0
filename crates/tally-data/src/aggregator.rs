//! Monthly aggregation of extracted email dates.
//!
//! Dates are grouped by calendar month; every month between the earliest and
//! latest observed month is present in the output, zero-count months
//! included, so the time axis has no holes.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tally_core::models::{MonthBucket, MonthKey, MonthlySeries};
use tracing::debug;

/// Stateless helper that groups dates by calendar month.
pub struct MonthAggregator;

impl MonthAggregator {
    /// Count `dates` per calendar month. Only observed months are present.
    pub fn count_by_month<I>(dates: I) -> BTreeMap<MonthKey, u64>
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let mut counts: BTreeMap<MonthKey, u64> = BTreeMap::new();
        for date in dates {
            *counts.entry(MonthKey::from_date(date)).or_insert(0) += 1;
        }
        counts
    }

    /// Expand sparse month counts into a contiguous, chronological run.
    pub fn fill_gaps(counts: &BTreeMap<MonthKey, u64>) -> Vec<MonthBucket> {
        let (Some((&first, _)), Some((&last, _))) =
            (counts.first_key_value(), counts.last_key_value())
        else {
            return Vec::new();
        };

        let mut buckets = Vec::with_capacity(first.span_inclusive(last));
        let mut key = first;
        loop {
            buckets.push(MonthBucket {
                key,
                count: counts.get(&key).copied().unwrap_or(0),
            });
            if key == last {
                break;
            }
            key = key.succ();
        }
        buckets
    }

    /// Group, gap-fill and average `dates` into a [`MonthlySeries`].
    ///
    /// The average divides by every month in the span, including empty ones.
    /// An empty input yields an empty series with an average of `0.0`.
    pub fn aggregate<I>(dates: I) -> MonthlySeries
    where
        I: IntoIterator<Item = NaiveDate>,
    {
        let counts = Self::count_by_month(dates);
        let buckets = Self::fill_gaps(&counts);
        let total: u64 = buckets.iter().map(|b| b.count).sum();
        let average = if buckets.is_empty() {
            0.0
        } else {
            total as f64 / buckets.len() as f64
        };

        debug!(
            "Monthly counts: {:?}",
            buckets.iter().map(|b| b.count).collect::<Vec<_>>()
        );
        debug!(
            "Aggregated {} emails over {} months, average {:.2}",
            total,
            buckets.len(),
            average
        );

        MonthlySeries {
            buckets,
            total,
            average,
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
