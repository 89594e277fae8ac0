use std::fmt;

use chrono::{Datelike, NaiveDate};

// ── MonthKey ──────────────────────────────────────────────────────────────────

/// A calendar month, ordered chronologically (year first, then month).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    pub year: i32,
    /// 1-based month number (1 = January).
    pub month: u32,
}

impl MonthKey {
    /// Build a key, returning `None` when `month` is outside `1..=12`.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The following calendar month.
    pub fn succ(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Number of months from `self` to `other`, counting both ends.
    ///
    /// Returns `0` when `other` precedes `self`.
    pub fn span_inclusive(self, other: MonthKey) -> usize {
        let start = i64::from(self.year) * 12 + i64::from(self.month);
        let end = i64::from(other.year) * 12 + i64::from(other.month);
        if end < start {
            0
        } else {
            (end - start + 1) as usize
        }
    }

    /// Human-readable label, e.g. `"Jan 2023"`.
    pub fn label(&self) -> String {
        match NaiveDate::from_ymd_opt(self.year, self.month, 1) {
            Some(first) => first.format("%b %Y").to_string(),
            None => format!("{:04}-{:02}", self.year, self.month),
        }
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

// ── MonthBucket ───────────────────────────────────────────────────────────────

/// Number of emails dated within one calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthBucket {
    pub key: MonthKey,
    pub count: u64,
}

// ── MonthlySeries ─────────────────────────────────────────────────────────────

/// Gap-free, chronologically ordered month buckets plus the overall average.
///
/// Read-only view produced by the aggregator and consumed by the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlySeries {
    /// One bucket per month from the earliest to the latest observed month.
    pub buckets: Vec<MonthBucket>,
    /// Sum of all bucket counts.
    pub total: u64,
    /// `total / buckets.len()`, or `0.0` for an empty series.
    pub average: f64,
}

impl MonthlySeries {
    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Number of months spanned.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    /// Largest single-month count, `0` when empty.
    pub fn max_count(&self) -> u64 {
        self.buckets.iter().map(|b| b.count).max().unwrap_or(0)
    }

    pub fn first_month(&self) -> Option<MonthKey> {
        self.buckets.first().map(|b| b.key)
    }

    pub fn last_month(&self) -> Option<MonthKey> {
        self.buckets.last().map(|b| b.key)
    }

    /// Centered moving average over `window` months.
    ///
    /// Near the edges only the neighbours that exist are averaged. A window
    /// of `0` or `1` returns the raw counts.
    pub fn moving_average(&self, window: usize) -> Vec<f64> {
        let n = self.buckets.len();
        let half = window / 2;
        (0..n)
            .map(|i| {
                let lo = i.saturating_sub(half);
                let hi = (i + half).min(n.saturating_sub(1));
                let slice = &self.buckets[lo..=hi];
                let sum: u64 = slice.iter().map(|b| b.count).sum();
                sum as f64 / slice.len() as f64
            })
            .collect()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn key(year: i32, month: u32) -> MonthKey {
        MonthKey::new(year, month).unwrap()
    }

    fn series(counts: &[u64]) -> MonthlySeries {
        let mut k = key(2023, 1);
        let mut buckets = Vec::new();
        for &count in counts {
            buckets.push(MonthBucket { key: k, count });
            k = k.succ();
        }
        let total: u64 = counts.iter().sum();
        MonthlySeries {
            average: total as f64 / counts.len().max(1) as f64,
            buckets,
            total,
        }
    }

    #[test]
    fn test_month_key_rejects_out_of_range() {
        assert!(MonthKey::new(2023, 0).is_none());
        assert!(MonthKey::new(2023, 13).is_none());
        assert!(MonthKey::new(2023, 12).is_some());
    }

    #[test]
    fn test_month_key_orders_by_year_then_month() {
        assert!(key(2022, 12) < key(2023, 1));
        assert!(key(2023, 2) < key(2023, 11));
    }

    #[test]
    fn test_succ_wraps_year() {
        assert_eq!(key(2023, 12).succ(), key(2024, 1));
        assert_eq!(key(2023, 5).succ(), key(2023, 6));
    }

    #[test]
    fn test_span_inclusive() {
        assert_eq!(key(2023, 1).span_inclusive(key(2023, 4)), 4);
        assert_eq!(key(2023, 11).span_inclusive(key(2024, 2)), 4);
        assert_eq!(key(2023, 6).span_inclusive(key(2023, 6)), 1);
        assert_eq!(key(2023, 6).span_inclusive(key(2023, 5)), 0);
    }

    #[test]
    fn test_label_is_human_readable() {
        assert_eq!(key(2023, 1).label(), "Jan 2023");
        assert_eq!(key(2024, 9).to_string(), "Sep 2024");
    }

    #[test]
    fn test_from_date() {
        let d = NaiveDate::from_ymd_opt(2023, 6, 5).unwrap();
        assert_eq!(MonthKey::from_date(d), key(2023, 6));
    }

    #[test]
    fn test_series_accessors() {
        let s = series(&[2, 0, 7]);
        assert_eq!(s.len(), 3);
        assert_eq!(s.max_count(), 7);
        assert_eq!(s.first_month(), Some(key(2023, 1)));
        assert_eq!(s.last_month(), Some(key(2023, 3)));
        assert!(MonthlySeries::default().is_empty());
        assert_eq!(MonthlySeries::default().max_count(), 0);
    }

    #[test]
    fn test_moving_average_centered_window() {
        let s = series(&[3, 6, 9, 0]);
        let ma = s.moving_average(3);
        assert_eq!(ma.len(), 4);
        assert!((ma[0] - 4.5).abs() < 1e-9); // (3 + 6) / 2
        assert!((ma[1] - 6.0).abs() < 1e-9); // (3 + 6 + 9) / 3
        assert!((ma[2] - 5.0).abs() < 1e-9); // (6 + 9 + 0) / 3
        assert!((ma[3] - 4.5).abs() < 1e-9); // (9 + 0) / 2
    }

    #[test]
    fn test_moving_average_window_one_is_identity() {
        let s = series(&[1, 4, 2]);
        assert_eq!(s.moving_average(1), vec![1.0, 4.0, 2.0]);
        assert!(MonthlySeries::default().moving_average(3).is_empty());
    }
}
