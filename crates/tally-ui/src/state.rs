//! Per-tool application state and the handlers that mutate it.
//!
//! Handlers call straight into the pure pipeline functions and return a
//! result; none of them touch the terminal, so they are tested without one.

use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::Rng;
use tally_core::{InputField, Result, TallyError};
use tally_data::{analyze_file, EmailReport};
use tally_quantum::cloud::NUM_POINTS;
use tally_quantum::{parse_trials, MeasurementTally, PointCloud, QuantumBox};
use tracing::{debug, info};

// ── Analyzer ──────────────────────────────────────────────────────────────────

/// How the monthly series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartStyle {
    /// Counts, average and optional trend as lines.
    Line,
    /// One bar per month, average in the title.
    Bar,
}

impl ChartStyle {
    pub fn toggle(self) -> Self {
        match self {
            ChartStyle::Line => ChartStyle::Bar,
            ChartStyle::Bar => ChartStyle::Line,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ChartStyle::Line => "line",
            ChartStyle::Bar => "bar",
        }
    }
}

/// What the analyzer's chart area currently shows.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalyzerDisplay {
    /// Nothing generated yet.
    Idle,
    Chart(EmailReport),
    /// The last run found no usable dates.
    NoData { records: usize, skipped: usize },
}

/// Result of a "Generate Graph" action that did not fail outright.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GenerateOutcome {
    NoFileSelected,
    Rendered {
        records: usize,
        parsed: usize,
        skipped: usize,
    },
    NoData {
        records: usize,
        skipped: usize,
    },
}

/// Email analyzer state.
#[derive(Debug, Clone)]
pub struct AnalyzerState {
    pub selected_file: Option<PathBuf>,
    pub display: AnalyzerDisplay,
    pub chart_style: ChartStyle,
    pub show_trend: bool,
    /// Months in the centered moving average.
    pub trend_window: usize,
}

impl AnalyzerState {
    pub fn new(trend_window: usize) -> Self {
        Self {
            selected_file: None,
            display: AnalyzerDisplay::Idle,
            chart_style: ChartStyle::Line,
            show_trend: true,
            trend_window,
        }
    }

    /// Remember `path` for the next "Generate Graph". The chart is unchanged.
    pub fn select_file(&mut self, path: PathBuf) {
        info!("Selected {}", path.display());
        self.selected_file = Some(path);
    }

    pub fn selected_name(&self) -> Option<String> {
        self.selected_file.as_deref().map(display_name)
    }

    pub fn can_generate(&self) -> bool {
        self.selected_file.is_some()
    }

    /// Run the pipeline on the selected file, replacing the current display.
    ///
    /// File access errors leave the display untouched and are returned; an
    /// empty result switches the display to the "no data" message.
    pub fn generate(&mut self) -> Result<GenerateOutcome> {
        let Some(path) = self.selected_file.as_deref() else {
            return Ok(GenerateOutcome::NoFileSelected);
        };
        info!("Generating graph for {}", path.display());

        match analyze_file(path) {
            Ok(report) => {
                let meta = &report.metadata;
                info!(
                    "Analysed {} records in {:.3}s (load {:.3}s, transform {:.3}s)",
                    meta.records,
                    meta.load_time_seconds + meta.transform_time_seconds,
                    meta.load_time_seconds,
                    meta.transform_time_seconds
                );
                let outcome = GenerateOutcome::Rendered {
                    records: report.records(),
                    parsed: report.parsed(),
                    skipped: report.skipped(),
                };
                self.display = AnalyzerDisplay::Chart(report);
                Ok(outcome)
            }
            Err(TallyError::EmptyResult { records, skipped }) => {
                self.display = AnalyzerDisplay::NoData { records, skipped };
                Ok(GenerateOutcome::NoData { records, skipped })
            }
            Err(e) => Err(e),
        }
    }

    pub fn report(&self) -> Option<&EmailReport> {
        match &self.display {
            AnalyzerDisplay::Chart(report) => Some(report),
            _ => None,
        }
    }

    pub fn toggle_chart_style(&mut self) {
        self.chart_style = self.chart_style.toggle();
    }

    pub fn toggle_trend(&mut self) {
        self.show_trend = !self.show_trend;
    }

    /// Moving-average values when the trend line is on and a chart is shown.
    pub fn trend(&self) -> Option<Vec<f64>> {
        if !self.show_trend {
            return None;
        }
        self.report()
            .map(|r| r.series.moving_average(self.trend_window))
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

// ── Quantum ───────────────────────────────────────────────────────────────────

pub const DEFAULT_STATES: &str = "Left,Right";
pub const DEFAULT_AMPLITUDES: &str = "1,1";
pub const DEFAULT_TRIALS: &str = "1000";

/// Quantum demo state: raw field text plus the last validated configuration.
#[derive(Debug, Clone)]
pub struct QuantumState {
    pub states_input: String,
    pub amplitudes_input: String,
    pub trials_input: String,
    pub focus: InputField,
    /// Present only after a successful "Set Box Configuration".
    pub config: Option<QuantumBox>,
    /// Inline validation message and the field it belongs under.
    pub error: Option<(InputField, String)>,
    pub last_measurement: Option<String>,
    pub tally: Option<MeasurementTally>,
}

impl Default for QuantumState {
    fn default() -> Self {
        Self {
            states_input: DEFAULT_STATES.to_string(),
            amplitudes_input: DEFAULT_AMPLITUDES.to_string(),
            trials_input: DEFAULT_TRIALS.to_string(),
            focus: InputField::States,
            config: None,
            error: None,
            last_measurement: None,
            tally: None,
        }
    }
}

impl QuantumState {
    pub fn input(&self, field: InputField) -> &str {
        match field {
            InputField::States => &self.states_input,
            InputField::Amplitudes => &self.amplitudes_input,
            InputField::Trials => &self.trials_input,
        }
    }

    fn input_mut(&mut self, field: InputField) -> &mut String {
        match field {
            InputField::States => &mut self.states_input,
            InputField::Amplitudes => &mut self.amplitudes_input,
            InputField::Trials => &mut self.trials_input,
        }
    }

    /// Inline error for `field`, if the last action failed there.
    pub fn error_for(&self, field: InputField) -> Option<&str> {
        match &self.error {
            Some((f, message)) if *f == field => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = match self.focus {
            InputField::States => InputField::Amplitudes,
            InputField::Amplitudes => InputField::Trials,
            InputField::Trials => InputField::States,
        };
    }

    pub fn focus_prev(&mut self) {
        self.focus = match self.focus {
            InputField::States => InputField::Trials,
            InputField::Amplitudes => InputField::States,
            InputField::Trials => InputField::Amplitudes,
        };
    }

    pub fn type_char(&mut self, c: char) {
        let field = self.focus;
        self.input_mut(field).push(c);
    }

    pub fn backspace(&mut self) {
        let field = self.focus;
        self.input_mut(field).pop();
    }

    pub fn is_configured(&self) -> bool {
        self.config.is_some()
    }

    /// "Set Box Configuration": parse and validate States and Amplitudes.
    ///
    /// On failure the previous configuration is dropped so measurement stays
    /// disabled until the input is fixed.
    pub fn set_configuration(&mut self) -> Result<&QuantumBox> {
        self.tally = None;
        self.last_measurement = None;
        match QuantumBox::from_inputs(&self.states_input, &self.amplitudes_input) {
            Ok(config) => {
                info!("Box configured with {} states", config.len());
                debug!("{}", config.describe());
                self.error = None;
                Ok(&*self.config.insert(config))
            }
            Err(e) => {
                self.config = None;
                self.note_error(&e);
                Err(e)
            }
        }
    }

    /// "Measure One". `None` when no configuration is set.
    pub fn measure_one<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<&str> {
        let config = self.config.as_ref()?;
        let label = config.measure_label(rng).to_string();
        info!("Measured {}", label);
        self.last_measurement = Some(label);
        self.last_measurement.as_deref()
    }

    /// "Simulate Many Trials". `Ok(None)` when no configuration is set.
    pub fn simulate_many<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<Option<&MeasurementTally>> {
        let Some(config) = self.config.as_ref() else {
            return Ok(None);
        };
        let result = parse_trials(&self.trials_input).and_then(|n| config.simulate(n, rng));
        match result {
            Ok(tally) => {
                info!("Simulated {} trials", tally.trials());
                self.error = None;
                Ok(Some(&*self.tally.insert(tally)))
            }
            Err(e) => {
                self.note_error(&e);
                Err(e)
            }
        }
    }

    fn note_error(&mut self, err: &TallyError) {
        if let TallyError::InvalidInput { field, message } = err {
            self.error = Some((*field, message.clone()));
        }
    }
}

// ── Point cloud ───────────────────────────────────────────────────────────────

/// Point cloud state. Runs from start-up until stopped.
#[derive(Debug, Clone)]
pub struct CloudState {
    pub cloud: PointCloud,
    pub running: bool,
    rng: StdRng,
}

impl CloudState {
    /// A fresh cloud of `dimensions` drawn from `rng`, already running.
    pub fn new(dimensions: usize, mut rng: StdRng) -> Result<Self> {
        let cloud = PointCloud::new(&mut rng, NUM_POINTS, dimensions)?;
        Ok(Self::from_cloud(cloud, rng))
    }

    /// Same as [`new`](Self::new) with the default dimension count.
    pub fn with_default_dimensions(mut rng: StdRng) -> Self {
        let cloud = PointCloud::with_defaults(&mut rng);
        Self::from_cloud(cloud, rng)
    }

    fn from_cloud(cloud: PointCloud, rng: StdRng) -> Self {
        info!(
            "Point cloud with {} points in {} dimensions",
            cloud.len(),
            cloud.dimensions()
        );
        Self {
            cloud,
            running: true,
            rng,
        }
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    /// New random points, then start running again.
    pub fn reset(&mut self) {
        self.cloud.regenerate(&mut self.rng);
        self.running = true;
    }

    /// One evolution step when running. Returns whether a step was taken.
    pub fn tick(&mut self) -> bool {
        if self.running {
            self.cloud.evolve(&mut self.rng);
        }
        self.running
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
