//! `Date` header extraction and parsing.
//!
//! Each record's header block is scanned for the first field labelled `Date`
//! (case-insensitive, surrounding whitespace ignored). The value is parsed as
//! an RFC 2822 date first, then with a small set of relaxed fallbacks. Only
//! the calendar date as written in the header is kept.

use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use regex::Regex;
use thiserror::Error;

use crate::splitter::EmailRecord;

/// Why a record produced no date. Counted, never fatal.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("no Date header")]
    NoDateHeader,
    #[error("unrecognised date value {0:?}")]
    Unparsable(String),
}

const RELAXED_DATETIME_FORMATS: &[&str] = &[
    "%d %b %Y %H:%M:%S",
    "%d %B %Y %H:%M:%S",
    "%d %b %Y %H:%M",
    "%d %B %Y %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M",
];

const RELAXED_DATE_FORMATS: &[&str] = &["%d %b %Y", "%d %B %Y", "%Y-%m-%d"];

/// Extract the calendar date from `record`'s `Date` header.
pub fn extract_date(record: &EmailRecord<'_>) -> Result<NaiveDate, SkipReason> {
    let value = find_date_header(record.header_block()).ok_or(SkipReason::NoDateHeader)?;
    parse_date_value(&value).ok_or(SkipReason::Unparsable(value))
}

/// Return the unfolded value of the first `Date` field in `header_block`.
pub fn find_date_header(header_block: &str) -> Option<String> {
    let mut current: Option<(&str, String)> = None;

    for line in header_block.lines() {
        if line.starts_with([' ', '\t']) {
            // Folded continuation of the open field, whatever it contains.
            if let Some((_, value)) = current.as_mut() {
                let piece = line.trim();
                if !piece.is_empty() {
                    if !value.is_empty() {
                        value.push(' ');
                    }
                    value.push_str(piece);
                }
                continue;
            }
        }
        if let Some((label, value)) = field_label(line) {
            if let Some(found) = take_if_date(current.take()) {
                return Some(found);
            }
            current = Some((label, value.trim().to_string()));
        } else if let Some(found) = take_if_date(current.take()) {
            return Some(found);
        }
    }

    take_if_date(current)
}

/// Parse a `Date` header value into the calendar date it names.
///
/// Time of day and zone are discarded; the date is the one written in the
/// header, not converted to UTC.
pub fn parse_date_value(value: &str) -> Option<NaiveDate> {
    let cleaned = normalise(value);
    if cleaned.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(&cleaned) {
        return Some(dt.date_naive());
    }

    parse_relaxed(&cleaned)
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Split `Label: value`, where the label is a single header token starting
/// with a letter (so a folded `14:02:00` is not mistaken for a field).
fn field_label(line: &str) -> Option<(&str, &str)> {
    let (label, value) = line.trim_start().split_once(':')?;
    let label = label.trim_end();
    let is_token = label.starts_with(|c: char| c.is_ascii_alphabetic())
        && label
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    is_token.then_some((label, value))
}

fn take_if_date(field: Option<(&str, String)>) -> Option<String> {
    field
        .filter(|(label, _)| label.eq_ignore_ascii_case("date"))
        .map(|(_, value)| value)
}

/// Drop `(comments)` and collapse runs of whitespace.
fn normalise(value: &str) -> String {
    static COMMENT: OnceLock<Regex> = OnceLock::new();
    static SPACES: OnceLock<Regex> = OnceLock::new();
    let comment = COMMENT.get_or_init(|| Regex::new(r"\([^()]*\)").expect("regex is valid"));
    let spaces = SPACES.get_or_init(|| Regex::new(r"\s+").expect("regex is valid"));

    let without_comments = comment.replace_all(value, " ");
    spaces.replace_all(&without_comments, " ").trim().to_string()
}

/// Fallback for values RFC 2822 rejects: optional weekday, optional zone.
fn parse_relaxed(cleaned: &str) -> Option<NaiveDate> {
    static WEEKDAY: OnceLock<Regex> = OnceLock::new();
    static ZONE: OnceLock<Regex> = OnceLock::new();
    let weekday = WEEKDAY.get_or_init(|| {
        Regex::new(r"(?i)^(?:mon|tue|wed|thu|fri|sat|sun)[a-z]*\.?,?\s+").expect("regex is valid")
    });
    let zone = ZONE.get_or_init(|| {
        Regex::new(r"\s+(?:[+-]\d{2}:?\d{2}|[A-Za-z]{1,5})$").expect("regex is valid")
    });

    let without_weekday = weekday.replace(cleaned, "");
    let core = zone.replace(&without_weekday, "");
    let core = core.trim();

    for fmt in RELAXED_DATETIME_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(core, fmt) {
            return Some(naive.date());
        }
    }
    for fmt in RELAXED_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(core, fmt) {
            return Some(date);
        }
    }
    None
}

// ── Tests ─────────────────────────────────────────────────────────────────────
