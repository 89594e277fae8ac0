//! Main application state and TUI event loop.
//!
//! [`App`] owns the theme, every tool's state and the modal overlays. Key
//! handling is separated from drawing so every control can be driven in
//! tests without a terminal.

use std::io;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    widgets::Paragraph,
    Frame, Terminal,
};
use tracing::{error, info};

use tally_core::settings::{Settings, Tool};
use tally_core::{InputField, TallyError};

use crate::analyzer_view;
use crate::cloud_view;
use crate::components::controls::{Button, ButtonBar};
use crate::components::header::Header;
use crate::components::status::{Dialog, StatusLine};
use crate::file_picker::{FilePicker, PickerAction};
use crate::quantum_view;
use crate::state::{AnalyzerState, ChartStyle, CloudState, GenerateOutcome, QuantumState};
use crate::themes::Theme;

/// Interval between point cloud steps while the cloud is on screen.
pub const CLOUD_STEP: Duration = Duration::from_millis(50);

// ── App ───────────────────────────────────────────────────────────────────────

/// Root application state.
pub struct App {
    /// Active colour theme.
    pub theme: Theme,
    /// Tool currently on screen.
    pub tool: Tool,
    pub analyzer: AnalyzerState,
    pub quantum: QuantumState,
    pub cloud: CloudState,
    /// Open file picker, drawn over the analyzer.
    pub picker: Option<FilePicker>,
    /// Open error dialog, drawn over everything.
    pub dialog: Option<Dialog>,
    pub status: StatusLine,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
    rng: StdRng,
}

impl App {
    /// Construct an application showing `tool`, measuring with `rng`.
    ///
    /// The point cloud draws from its own generator seeded from `rng`.
    pub fn new(theme_name: &str, tool: Tool, trend_window: usize, mut rng: StdRng) -> Self {
        let cloud_rng = StdRng::seed_from_u64(rng.gen());
        Self {
            theme: Theme::from_name(theme_name),
            tool,
            analyzer: AnalyzerState::new(trend_window),
            quantum: QuantumState::default(),
            cloud: CloudState::with_default_dimensions(cloud_rng),
            picker: None,
            dialog: None,
            status: StatusLine::info("Ready"),
            should_quit: false,
            rng,
        }
    }

    /// Build the application from parsed command-line settings.
    ///
    /// `--seed` makes measurements and the point cloud reproducible;
    /// `--file` pre-selects a file without running the pipeline.
    pub fn from_settings(settings: &Settings) -> tally_core::Result<Self> {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let mut app = Self::new(
            &settings.theme,
            settings.tool(),
            settings.trend_window as usize,
            rng,
        );
        let cloud_rng = StdRng::seed_from_u64(app.rng.gen());
        app.cloud = CloudState::new(settings.dimensions as usize, cloud_rng)?;
        if let Some(path) = &settings.file {
            app.select_file(path.clone());
        }
        Ok(app)
    }

    // ── Event loop ────────────────────────────────────────────────────────────

    /// Run the TUI until the user quits.
    ///
    /// Uses `crossterm::event::poll` with a 250 ms timeout, shortened to the
    /// next point cloud step while that tool is shown. Every action is
    /// handled synchronously before the next frame is drawn.
    pub fn run(mut self) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let tick_rate = Duration::from_millis(250);
        let mut last_step = Instant::now();
        info!("Starting UI on the {} tool", self.tool.as_str());

        let result = loop {
            if let Err(e) = terminal.draw(|frame| self.render(frame)) {
                break Err(e);
            }

            let timeout = if self.animating() {
                CLOUD_STEP.saturating_sub(last_step.elapsed())
            } else {
                tick_rate
            };
            match event::poll(timeout) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => self.handle_key(key),
                    Ok(_) => {}
                    Err(e) => break Err(e),
                },
                Ok(false) => {}
                Err(e) => break Err(e),
            }

            if last_step.elapsed() >= CLOUD_STEP {
                self.on_tick();
                last_step = Instant::now();
            }

            if self.should_quit {
                break Ok(());
            }
        };

        // Restore terminal state unconditionally.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    /// Whether the point cloud is on screen and moving.
    pub fn animating(&self) -> bool {
        self.tool == Tool::Cloud && self.cloud.running
    }

    /// Advance time-driven state by one step.
    pub fn on_tick(&mut self) {
        if self.tool == Tool::Cloud {
            self.cloud.tick();
        }
    }

    // ── Key handling ──────────────────────────────────────────────────────────

    /// Dispatch one key press: dialog, then picker, then global keys, then
    /// the active tool.
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        if ctrl && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return;
        }

        if self.dialog.is_some() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Enter) {
                self.dialog = None;
            }
            return;
        }

        if self.picker.is_some() {
            self.handle_picker_key(key);
            return;
        }

        match key.code {
            KeyCode::F(1) => self.switch_tool(Tool::Analyzer),
            KeyCode::F(2) => self.switch_tool(Tool::Quantum),
            KeyCode::F(3) => self.switch_tool(Tool::Cloud),
            _ => match self.tool {
                Tool::Analyzer => self.handle_analyzer_key(key),
                Tool::Quantum => self.handle_quantum_key(key),
                Tool::Cloud => self.handle_cloud_key(key),
            },
        }
    }

    fn switch_tool(&mut self, tool: Tool) {
        if self.tool != tool {
            info!("Switching to the {} tool", tool.as_str());
            self.tool = tool;
            self.status = StatusLine::info("Ready");
        }
    }

    fn handle_picker_key(&mut self, key: KeyEvent) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        match key.code {
            KeyCode::Up => picker.move_up(),
            KeyCode::Down => picker.move_down(),
            KeyCode::Backspace => picker.parent(),
            KeyCode::Char('a') | KeyCode::Char('A') => picker.toggle_filter(),
            KeyCode::Esc => {
                self.picker = None;
                self.status = StatusLine::info("File selection cancelled");
            }
            KeyCode::Enter => {
                if let PickerAction::Selected(path) = picker.activate() {
                    self.picker = None;
                    self.select_file(path);
                }
            }
            _ => {}
        }
    }

    fn handle_analyzer_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('s') | KeyCode::Char('S') => self.open_picker(),
            KeyCode::Char('g') | KeyCode::Char('G') => self.generate_graph(),
            KeyCode::Char('v') | KeyCode::Char('V') => {
                self.analyzer.toggle_chart_style();
                self.status =
                    StatusLine::info(format!("Chart style: {}", self.analyzer.chart_style.as_str()));
            }
            // Bars carry no trend line.
            KeyCode::Char('t') | KeyCode::Char('T')
                if self.analyzer.chart_style == ChartStyle::Line =>
            {
                self.analyzer.toggle_trend();
                let state = if self.analyzer.show_trend { "on" } else { "off" };
                self.status = StatusLine::info(format!("Trend line {state}"));
            }
            _ => {}
        }
    }

    fn handle_quantum_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('q') if ctrl => self.should_quit = true,
            KeyCode::Char('o') if ctrl => self.measure_one(),
            KeyCode::Char('r') if ctrl => self.simulate_many(),
            KeyCode::Char(_) if ctrl => {}
            KeyCode::Char(c) => self.quantum.type_char(c),
            KeyCode::Backspace => self.quantum.backspace(),
            KeyCode::Tab => self.quantum.focus_next(),
            KeyCode::BackTab => self.quantum.focus_prev(),
            KeyCode::Enter => match self.quantum.focus {
                InputField::Trials => self.simulate_many(),
                InputField::States | InputField::Amplitudes => self.set_configuration(),
            },
            _ => {}
        }
    }

    fn handle_cloud_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => self.should_quit = true,
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.cloud.start();
                self.status = StatusLine::info("Simulation running");
            }
            KeyCode::Char('x') | KeyCode::Char('X') => {
                self.cloud.stop();
                self.status = StatusLine::info("Simulation stopped");
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                self.cloud.reset();
                self.status = StatusLine::success(format!(
                    "Reset {} points in {} dimensions",
                    self.cloud.cloud.len(),
                    self.cloud.cloud.dimensions()
                ));
            }
            _ => {}
        }
    }

    // ── Analyzer actions ──────────────────────────────────────────────────────

    fn open_picker(&mut self) {
        let start = self
            .analyzer
            .selected_file
            .as_deref()
            .unwrap_or_else(|| Path::new("."));
        self.picker = Some(FilePicker::open(start));
        self.status = StatusLine::info("Choose an email text file");
    }

    fn select_file(&mut self, path: std::path::PathBuf) {
        self.analyzer.select_file(path);
        let name = self.analyzer.selected_name().unwrap_or_default();
        self.status = StatusLine::info(format!("Selected {name}"));
    }

    fn generate_graph(&mut self) {
        self.status = match self.analyzer.generate() {
            Ok(GenerateOutcome::NoFileSelected) => {
                StatusLine::warning("Please select a text file first")
            }
            Ok(GenerateOutcome::Rendered {
                records,
                parsed,
                skipped,
            }) => StatusLine::success(format!(
                "Parsed {parsed} dates, skipped {skipped}, {records} records"
            )),
            Ok(GenerateOutcome::NoData { records, skipped }) => StatusLine::warning(format!(
                "No valid dates found, skipped {skipped} of {records} records"
            )),
            Err(e @ TallyError::FileAccess { .. }) => {
                error!("{}", e);
                self.dialog = Some(Dialog::new("File Error", e.to_string()));
                StatusLine::error("Could not read the selected file")
            }
            Err(e) => {
                error!("{}", e);
                StatusLine::error(e.to_string())
            }
        };
    }

    // ── Quantum actions ───────────────────────────────────────────────────────

    fn set_configuration(&mut self) {
        self.status = match self.quantum.set_configuration() {
            Ok(config) => StatusLine::success(format!("Box configured with {} states", config.len())),
            Err(e) => StatusLine::error(e.to_string()),
        };
    }

    fn measure_one(&mut self) {
        self.status = match self.quantum.measure_one(&mut self.rng) {
            Some(label) => StatusLine::info(format!("Measured: {label}")),
            None => StatusLine::warning("Set a box configuration first"),
        };
    }

    fn simulate_many(&mut self) {
        self.status = match self.quantum.simulate_many(&mut self.rng) {
            Ok(Some(tally)) => StatusLine::success(format!("Simulated {} trials", tally.trials())),
            Ok(None) => StatusLine::warning("Set a box configuration first"),
            Err(e) => StatusLine::error(e.to_string()),
        };
    }

    // ── Rendering ─────────────────────────────────────────────────────────────

    /// Render the current application state into `frame`.
    pub fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [header_area, body_area, buttons_area, status_area] = Layout::vertical([
            Constraint::Length(4),
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(area);

        frame.render_widget(
            Paragraph::new(Header::new(self.tool, &self.theme).to_lines()),
            header_area,
        );

        match self.tool {
            Tool::Analyzer => {
                analyzer_view::render_analyzer(frame, body_area, &self.analyzer, &self.theme)
            }
            Tool::Quantum => {
                quantum_view::render_quantum(frame, body_area, &self.quantum, &self.theme)
            }
            Tool::Cloud => cloud_view::render_cloud(frame, body_area, &self.cloud, &self.theme),
        }

        frame.render_widget(Paragraph::new(self.button_bar().to_line()), buttons_area);
        frame.render_widget(
            Paragraph::new(self.status.to_line(&self.theme)),
            status_area,
        );

        if let Some(picker) = &self.picker {
            picker.render(frame, area, &self.theme);
        }
        if let Some(dialog) = &self.dialog {
            dialog.render(frame, area, &self.theme);
        }
    }

    fn button_bar(&self) -> ButtonBar<'_> {
        let buttons = match self.tool {
            Tool::Analyzer => {
                let is_line = self.analyzer.chart_style == ChartStyle::Line;
                vec![
                    Button::new("s", "Select Email Text File"),
                    Button::new("g", "Generate Graph").enabled(self.analyzer.can_generate()),
                    Button::new("v", if is_line { "Bar Chart" } else { "Line Chart" }),
                    Button::new("t", if self.analyzer.show_trend { "Hide Trend" } else { "Show Trend" })
                        .enabled(is_line),
                    Button::new("q", "Quit"),
                ]
            }
            Tool::Quantum => vec![
                Button::new("Enter", "Set Box Configuration"),
                Button::new("Ctrl+O", "Measure One").enabled(self.quantum.is_configured()),
                Button::new("Ctrl+R", "Simulate Many Trials").enabled(self.quantum.is_configured()),
                Button::new("Tab", "Next Field"),
                Button::new("Ctrl+Q", "Quit"),
            ],
            Tool::Cloud => vec![
                Button::new("s", "Start").enabled(!self.cloud.running),
                Button::new("x", "Stop").enabled(self.cloud.running),
                Button::new("r", "Reset"),
                Button::new("q", "Quit"),
            ],
        };
        ButtonBar::new(buttons, &self.theme)
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────
