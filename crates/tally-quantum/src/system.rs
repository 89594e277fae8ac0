//! A toy quantum system: labelled basis states with complex amplitudes.
//!
//! Probabilities follow the Born rule, `p_i = |a_i|² / Σ_j |a_j|²`.
//! Measurement is a weighted draw from an injected random source, so callers
//! decide between a seeded generator (tests, `--seed`) and entropy.

use num_complex::Complex64;
use rand::Rng;
use tally_core::formatting::{format_complex, format_probability};
use tally_core::{InputField, Result, TallyError};
use tracing::debug;

use crate::input::{parse_amplitudes, parse_states};
use crate::tally::MeasurementTally;

/// One row of the configuration table.
#[derive(Debug, Clone, PartialEq)]
pub struct StateInfo {
    pub label: String,
    /// Amplitude divided by the vector norm.
    pub amplitude: Complex64,
    pub probability: f64,
}

/// A validated superposition over named states.
#[derive(Debug, Clone, PartialEq)]
pub struct QuantumBox {
    states: Vec<String>,
    amplitudes: Vec<Complex64>,
    probabilities: Vec<f64>,
    norm: f64,
}

impl QuantumBox {
    /// Build a system from labels and raw (unnormalised) amplitudes.
    ///
    /// Rejects an empty state set, mismatched lengths, duplicate labels,
    /// non-finite amplitudes and the all-zero vector.
    pub fn new(states: Vec<String>, amplitudes: Vec<Complex64>) -> Result<Self> {
        if states.is_empty() {
            return Err(TallyError::invalid(
                InputField::States,
                "enter at least one state label",
            ));
        }
        if amplitudes.len() != states.len() {
            return Err(TallyError::invalid(
                InputField::Amplitudes,
                format!(
                    "got {} amplitudes for {} states",
                    amplitudes.len(),
                    states.len()
                ),
            ));
        }
        for (i, label) in states.iter().enumerate() {
            if states[..i].contains(label) {
                return Err(TallyError::invalid(
                    InputField::States,
                    format!("duplicate state label '{label}'"),
                ));
            }
        }
        if let Some(pos) = amplitudes.iter().position(|a| !a.is_finite()) {
            return Err(TallyError::invalid(
                InputField::Amplitudes,
                format!("amplitude for '{}' is not finite", states[pos]),
            ));
        }

        let norm_sqr: f64 = amplitudes.iter().map(|a| a.norm_sqr()).sum();
        if norm_sqr == 0.0 {
            return Err(TallyError::invalid(
                InputField::Amplitudes,
                "at least one amplitude must be non-zero",
            ));
        }
        if !norm_sqr.is_finite() {
            return Err(TallyError::invalid(
                InputField::Amplitudes,
                "amplitudes are too large to normalise",
            ));
        }

        let probabilities: Vec<f64> = amplitudes.iter().map(|a| a.norm_sqr() / norm_sqr).collect();
        debug!(
            "Configured {} states, probabilities {:?}",
            states.len(),
            probabilities
        );

        Ok(Self {
            states,
            amplitudes,
            probabilities,
            norm: norm_sqr.sqrt(),
        })
    }

    /// Parse the two comma-separated input fields and build the system.
    pub fn from_inputs(states: &str, amplitudes: &str) -> Result<Self> {
        let states = parse_states(states)?;
        let amplitudes = parse_amplitudes(amplitudes)?;
        Self::new(states, amplitudes)
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    /// Label of the state at `index`, if any.
    pub fn label(&self, index: usize) -> Option<&str> {
        self.states.get(index).map(String::as_str)
    }

    /// Born-rule probabilities, in state order. They sum to one.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Amplitudes scaled to unit norm.
    pub fn normalized_amplitudes(&self) -> Vec<Complex64> {
        self.amplitudes.iter().map(|&a| a / self.norm).collect()
    }

    /// Per-state label, normalised amplitude and probability.
    pub fn configuration(&self) -> Vec<StateInfo> {
        self.states
            .iter()
            .zip(self.normalized_amplitudes())
            .zip(&self.probabilities)
            .map(|((label, amplitude), &probability)| StateInfo {
                label: label.clone(),
                amplitude,
                probability,
            })
            .collect()
    }

    /// Multi-line text form of [`configuration`](Self::configuration).
    pub fn describe(&self) -> String {
        let mut info = String::from("Box configuration:\n");
        for row in self.configuration() {
            info.push_str(&format!(
                "  {}: Amplitude = {}, Probability = {}\n",
                row.label,
                format_complex(row.amplitude.re, row.amplitude.im, 3),
                format_probability(row.probability)
            ));
        }
        let total: f64 = self.probabilities.iter().sum();
        info.push_str(&format!(
            "Total Probability Sum: {}\n",
            format_probability(total)
        ));
        info
    }

    /// One weighted draw. Returns the index of the observed state.
    ///
    /// Draws `u ∈ [0, 1)` and returns the first state whose cumulative
    /// probability exceeds it. Zero-probability states are never returned.
    pub fn measure<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let u: f64 = rng.gen();
        let mut cumulative = 0.0;
        for (i, &p) in self.probabilities.iter().enumerate() {
            cumulative += p;
            if p > 0.0 && u < cumulative {
                return i;
            }
        }
        // Rounding left the cumulative sum just below one.
        self.probabilities
            .iter()
            .rposition(|&p| p > 0.0)
            .unwrap_or(0)
    }

    /// One weighted draw, returned as the state label.
    pub fn measure_label<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.label(self.measure(rng)).unwrap_or_default()
    }

    /// `trials` independent draws tallied per state.
    pub fn simulate<R: Rng + ?Sized>(&self, trials: u64, rng: &mut R) -> Result<MeasurementTally> {
        if trials == 0 {
            return Err(TallyError::invalid(
                InputField::Trials,
                "number of trials must be a positive whole number",
            ));
        }

        let mut counts = vec![0u64; self.len()];
        for _ in 0..trials {
            counts[self.measure(rng)] += 1;
        }
        debug!("Simulated {} trials: {:?}", trials, counts);

        Ok(MeasurementTally::new(
            self.states.clone(),
            self.probabilities.clone(),
            counts,
        ))
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
