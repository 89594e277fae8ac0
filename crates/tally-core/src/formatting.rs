/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use tally_core::formatting::format_count;
///
/// assert_eq!(format_count(7), "7");
/// assert_eq!(format_count(1_234), "1,234");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Format a non-integer statistic (e.g. an average count) with thousands
/// separators and `decimals` fractional digits.
///
/// # Examples
///
/// ```
/// use tally_core::formatting::format_decimal;
///
/// assert_eq!(format_decimal(3.456, 2), "3.46");
/// assert_eq!(format_decimal(1_500.0, 1), "1,500.0");
/// assert_eq!(format_decimal(-2.6, 0), "-3");
/// ```
pub fn format_decimal(value: f64, decimals: usize) -> String {
    let fixed = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed.as_str(), None),
    };
    let mut out = String::new();
    if value < 0.0 && fixed.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part));
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(frac);
    }
    out
}

/// Format a probability in `[0, 1]` with three decimals.
///
/// ```
/// use tally_core::formatting::format_probability;
///
/// assert_eq!(format_probability(0.36), "0.360");
/// ```
pub fn format_probability(p: f64) -> String {
    format!("{:.3}", p)
}

/// Format a complex number as `re±imj` with `decimals` fractional digits.
///
/// ```
/// use tally_core::formatting::format_complex;
///
/// assert_eq!(format_complex(0.6, 0.0, 3), "0.600+0.000j");
/// assert_eq!(format_complex(0.0, -0.8, 3), "0.000-0.800j");
/// ```
pub fn format_complex(re: f64, im: f64, decimals: usize) -> String {
    let sign = if im.is_sign_negative() && im != 0.0 {
        '-'
    } else {
        '+'
    };
    format!("{:.*}{}{:.*}j", decimals, re, sign, decimals, im.abs())
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of a digit string.
fn group_thousands(digits: &str) -> String {
    let bytes = digits.as_bytes();
    let mut groups: Vec<&str> = bytes
        .rchunks(3)
        .filter_map(|chunk| std::str::from_utf8(chunk).ok())
        .collect();
    groups.reverse();
    groups.join(",")
}

// ── Tests ──────────────────────────────────────────────────────────────────────
