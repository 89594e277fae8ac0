//! Result of a multi-trial simulation.

/// Observed counts per state beside the theoretical probabilities.
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementTally {
    states: Vec<String>,
    probabilities: Vec<f64>,
    counts: Vec<u64>,
    trials: u64,
}

/// One state's row in a [`MeasurementTally`].
#[derive(Debug, Clone, PartialEq)]
pub struct TallyRow<'a> {
    pub label: &'a str,
    pub count: u64,
    /// `count / trials`.
    pub observed: f64,
    pub probability: f64,
    /// `probability × trials`.
    pub expected: f64,
}

impl MeasurementTally {
    pub(crate) fn new(states: Vec<String>, probabilities: Vec<f64>, counts: Vec<u64>) -> Self {
        let trials = counts.iter().sum();
        Self {
            states,
            probabilities,
            counts,
            trials,
        }
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn counts(&self) -> &[u64] {
        &self.counts
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    /// Observed frequencies, `count_i / trials`.
    pub fn frequencies(&self) -> Vec<f64> {
        if self.trials == 0 {
            return vec![0.0; self.counts.len()];
        }
        let n = self.trials as f64;
        self.counts.iter().map(|&c| c as f64 / n).collect()
    }

    /// Expected counts, `probability_i × trials`.
    pub fn expected_counts(&self) -> Vec<f64> {
        let n = self.trials as f64;
        self.probabilities.iter().map(|&p| p * n).collect()
    }

    /// Largest of the observed and expected counts, for chart scaling.
    pub fn max_count(&self) -> f64 {
        let observed = self.counts.iter().copied().max().unwrap_or(0) as f64;
        self.expected_counts().into_iter().fold(observed, f64::max)
    }

    pub fn rows(&self) -> Vec<TallyRow<'_>> {
        self.states
            .iter()
            .zip(&self.counts)
            .zip(self.frequencies())
            .zip(self.expected_counts())
            .zip(&self.probabilities)
            .map(|((((label, &count), observed), expected), &probability)| TallyRow {
                label,
                count,
                observed,
                probability,
                expected,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MeasurementTally {
        MeasurementTally::new(
            vec!["Alive".into(), "Dead".into()],
            vec![0.36, 0.64],
            vec![30, 70],
        )
    }

    #[test]
    fn test_trials_is_sum_of_counts() {
        assert_eq!(sample().trials(), 100);
    }

    #[test]
    fn test_frequencies_and_expected() {
        let tally = sample();
        assert_eq!(tally.frequencies(), vec![0.3, 0.7]);
        let expected = tally.expected_counts();
        assert!((expected[0] - 36.0).abs() < 1e-9);
        assert!((expected[1] - 64.0).abs() < 1e-9);
        assert_eq!(tally.max_count(), 70.0);
    }

    #[test]
    fn test_rows_line_up() {
        let tally = sample();
        let rows = tally.rows();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].label, "Dead");
        assert_eq!(rows[1].count, 70);
        assert!((rows[1].observed - 0.7).abs() < 1e-12);
        assert!((rows[1].probability - 0.64).abs() < 1e-12);
    }
}
