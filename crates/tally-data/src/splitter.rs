//! Splitting raw mailbox text into email records.
//!
//! A record is a maximal run of non-blank lines. Any line that contains only
//! whitespace (including a bare `\r` from CRLF exports) counts as blank.

/// One block of text between blank-line separators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmailRecord<'a> {
    raw: &'a str,
}

impl<'a> EmailRecord<'a> {
    /// Wrap a block of text as a record.
    pub fn new(raw: &'a str) -> Self {
        Self { raw }
    }

    /// The record text exactly as it appeared in the input.
    pub fn raw(&self) -> &'a str {
        self.raw
    }

    /// Lines before the first blank line, or the whole record if it has none.
    pub fn header_block(&self) -> &'a str {
        let mut offset = 0;
        for line in self.raw.split_inclusive('\n') {
            if is_blank(line) {
                return &self.raw[..offset];
            }
            offset += line.len();
        }
        self.raw
    }

    /// Everything after the header block's terminating blank line.
    pub fn body(&self) -> &'a str {
        let header_len = self.header_block().len();
        let rest = &self.raw[header_len..];
        match rest.find('\n') {
            Some(i) => &rest[i + 1..],
            None => "",
        }
    }
}

/// Lazy iterator over the records of a text.
///
/// Cloning the iterator restarts it from the clone's position; calling
/// [`split_records`] again restarts from the beginning.
#[derive(Debug, Clone)]
pub struct EmailRecords<'a> {
    rest: &'a str,
}

/// Split `text` into records on runs of one or more blank lines.
///
/// Leading and trailing blank lines never produce empty records. Text without
/// any blank line yields exactly one record.
pub fn split_records(text: &str) -> EmailRecords<'_> {
    EmailRecords { rest: text }
}

impl<'a> Iterator for EmailRecords<'a> {
    type Item = EmailRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        // Skip separator lines.
        loop {
            if self.rest.is_empty() {
                return None;
            }
            let (line, tail) = split_first_line(self.rest);
            if !is_blank(line) {
                break;
            }
            self.rest = tail;
        }

        let start = self.rest;
        let mut cursor = self.rest;
        while !cursor.is_empty() {
            let (line, tail) = split_first_line(cursor);
            if is_blank(line) {
                break;
            }
            cursor = tail;
        }
        self.rest = cursor;

        let consumed = start.len() - cursor.len();
        let raw = start[..consumed].trim_end_matches(|c| c == '\n' || c == '\r');
        Some(EmailRecord { raw })
    }
}

pub(crate) fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Split off the first line (without its `\n`) from the remainder.
fn split_first_line(s: &str) -> (&str, &str) {
    match s.find('\n') {
        Some(i) => (&s[..i], &s[i + 1..]),
        None => (s, ""),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
