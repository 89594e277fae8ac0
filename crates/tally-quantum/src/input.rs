//! Parsing of the quantum demo's text inputs.
//!
//! States and amplitudes are comma-separated lists; surrounding whitespace is
//! trimmed and empty items are dropped. Amplitudes accept real numbers and
//! complex numbers written with a `j` or `i` imaginary unit.

use std::collections::HashSet;

use num_complex::Complex64;
use tally_core::formatting::format_count;
use tally_core::{InputField, Result, TallyError};

/// Split a comma-separated list, trimming items and dropping empty ones.
fn split_items(input: &str) -> impl Iterator<Item = &str> {
    input.split(',').map(str::trim).filter(|s| !s.is_empty())
}

/// Parse the state-label list, rejecting an empty set and duplicates.
pub fn parse_states(input: &str) -> Result<Vec<String>> {
    let states: Vec<String> = split_items(input).map(str::to_string).collect();
    if states.is_empty() {
        return Err(TallyError::invalid(
            InputField::States,
            "enter at least one state label",
        ));
    }

    let mut seen = HashSet::new();
    if let Some(dup) = states.iter().find(|s| !seen.insert(s.as_str())) {
        return Err(TallyError::invalid(
            InputField::States,
            format!("duplicate state label '{dup}'"),
        ));
    }
    Ok(states)
}

/// Parse the amplitude list. Finiteness is checked later, at configuration.
pub fn parse_amplitudes(input: &str) -> Result<Vec<Complex64>> {
    let amplitudes = split_items(input)
        .map(|item| {
            parse_complex(item).ok_or_else(|| {
                TallyError::invalid(
                    InputField::Amplitudes,
                    format!("'{item}' is not a real or complex number"),
                )
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if amplitudes.is_empty() {
        return Err(TallyError::invalid(
            InputField::Amplitudes,
            "enter at least one amplitude",
        ));
    }
    Ok(amplitudes)
}

/// Largest trial count accepted; draws run on the event thread.
pub const MAX_TRIALS: u64 = 1_000_000;

/// Parse the trial count: a whole number in `1..=MAX_TRIALS`.
pub fn parse_trials(input: &str) -> Result<u64> {
    match input.trim().parse::<u64>() {
        Ok(n) if n > MAX_TRIALS => Err(TallyError::invalid(
            InputField::Trials,
            format!("number of trials must be at most {}", format_count(MAX_TRIALS)),
        )),
        Ok(n) if n > 0 => Ok(n),
        _ => Err(TallyError::invalid(
            InputField::Trials,
            "number of trials must be a positive whole number",
        )),
    }
}

/// Parse `a`, `bj`, `a+bj`, `a-bj`, `(a+bj)`, `j` or `-j` (`i` also accepted).
///
/// ```
/// use num_complex::Complex64;
/// use tally_quantum::input::parse_complex;
///
/// assert_eq!(parse_complex("0.5-2j"), Some(Complex64::new(0.5, -2.0)));
/// assert_eq!(parse_complex("(1+1i)"), Some(Complex64::new(1.0, 1.0)));
/// assert_eq!(parse_complex("-j"), Some(Complex64::new(0.0, -1.0)));
/// ```
pub fn parse_complex(input: &str) -> Option<Complex64> {
    let compact: String = input.chars().filter(|c| !c.is_whitespace()).collect();
    let body = match compact.strip_prefix('(') {
        Some(inner) => inner.strip_suffix(')')?,
        None => compact.as_str(),
    };
    if body.is_empty() {
        return None;
    }

    let Some(without_unit) = body.strip_suffix(['j', 'J', 'i', 'I']) else {
        return body.parse::<f64>().ok().map(|re| Complex64::new(re, 0.0));
    };

    match sign_split(without_unit) {
        Some(at) => {
            let re = without_unit[..at].parse::<f64>().ok()?;
            let im = parse_coefficient(&without_unit[at..])?;
            Some(Complex64::new(re, im))
        }
        None => parse_coefficient(without_unit).map(|im| Complex64::new(0.0, im)),
    }
}

/// Index of the `+`/`-` that separates real and imaginary parts, skipping a
/// leading sign and exponent signs.
fn sign_split(s: &str) -> Option<usize> {
    let bytes = s.as_bytes();
    (1..bytes.len())
        .rev()
        .find(|&i| matches!(bytes[i], b'+' | b'-') && !matches!(bytes[i - 1], b'e' | b'E'))
}

/// Imaginary coefficient; a bare sign means one.
fn parse_coefficient(s: &str) -> Option<f64> {
    match s {
        "" | "+" => Some(1.0),
        "-" => Some(-1.0),
        _ => s.parse::<f64>().ok(),
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
