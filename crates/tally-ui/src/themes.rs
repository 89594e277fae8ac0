use ratatui::style::{Color, Modifier, Style};

/// Terminal background type detection.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BackgroundType {
    Dark,
    Light,
    Unknown,
}

/// Detect terminal background type from the `COLORFGBG` environment variable.
///
/// The variable has the format `"foreground;background"`.  Background values
/// 0–6 are considered dark; 7–15 are considered light.  If the variable is
/// absent or unparseable, `BackgroundType::Dark` is returned.
pub fn detect_background() -> BackgroundType {
    if let Ok(val) = std::env::var("COLORFGBG") {
        if let Some(bg) = val.split(';').next_back() {
            if let Ok(bg_num) = bg.parse::<u8>() {
                return if bg_num <= 6 {
                    BackgroundType::Dark
                } else {
                    BackgroundType::Light
                };
            }
        }
    }
    BackgroundType::Dark
}

/// Complete theme definition carrying all UI styles used by tally-ui
/// components.
#[derive(Debug, Clone)]
pub struct Theme {
    // ── Header ───────────────────────────────────────────────────────────────
    pub header: Style,
    pub header_sparkle: Style,
    pub separator: Style,
    pub tab_active: Style,
    pub tab_inactive: Style,

    // ── Text ─────────────────────────────────────────────────────────────────
    pub text: Style,
    pub dim: Style,
    pub bold: Style,
    pub label: Style,
    pub value: Style,

    // ── Status ───────────────────────────────────────────────────────────────
    pub info: Style,
    pub success: Style,
    pub warning: Style,
    pub error: Style,

    // ── Controls ─────────────────────────────────────────────────────────────
    pub button_key: Style,
    pub button: Style,
    pub button_disabled: Style,
    pub input: Style,
    pub input_focused: Style,
    pub dialog_border: Style,

    // ── Charts ───────────────────────────────────────────────────────────────
    pub axis: Style,
    /// Monthly count line and bars below the average.
    pub series: Style,
    /// Bars at or above the average.
    pub series_high: Style,
    pub average: Style,
    pub trend: Style,
    /// Observed counts in the measurement chart.
    pub observed: Style,
    /// Expected counts in the measurement chart.
    pub expected: Style,

    // ── Table ────────────────────────────────────────────────────────────────
    pub table_header: Style,
    pub table_row: Style,
    pub table_row_alt: Style,
    pub table_total: Style,

    // ── File picker ──────────────────────────────────────────────────────────
    pub picker_dir: Style,
    pub picker_file: Style,
    pub picker_selected: Style,
}

impl Theme {
    // ── Constructors ─────────────────────────────────────────────────────────

    /// Dark-background terminal theme (default).
    pub fn dark() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Yellow),
            separator: Style::default().fg(Color::DarkGray),
            tab_active: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::Gray),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::Gray),
            value: Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            button_key: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            button: Style::default().fg(Color::White),
            button_disabled: Style::default().fg(Color::DarkGray),
            input: Style::default().fg(Color::White),
            input_focused: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            dialog_border: Style::default().fg(Color::Red),

            axis: Style::default().fg(Color::Gray),
            series: Style::default().fg(Color::Cyan),
            series_high: Style::default().fg(Color::Magenta),
            average: Style::default().fg(Color::Red),
            trend: Style::default().fg(Color::Green),
            observed: Style::default().fg(Color::Cyan),
            expected: Style::default().fg(Color::Yellow),

            table_header: Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),

            picker_dir: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            picker_file: Style::default().fg(Color::White),
            picker_selected: Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan),
        }
    }

    /// Light-background terminal theme.
    ///
    /// Uses dark colours for text and saturated accents so that content
    /// remains legible against a white/light-grey terminal canvas.
    pub fn light() -> Self {
        Self {
            header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            header_sparkle: Style::default().fg(Color::Magenta),
            separator: Style::default().fg(Color::Gray),
            tab_active: Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            tab_inactive: Style::default().fg(Color::DarkGray),

            text: Style::default().fg(Color::Black),
            dim: Style::default().fg(Color::Gray),
            bold: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
            label: Style::default().fg(Color::DarkGray),
            value: Style::default()
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),

            info: Style::default().fg(Color::Blue),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            button_key: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            button: Style::default().fg(Color::Black),
            button_disabled: Style::default().fg(Color::Gray),
            input: Style::default().fg(Color::Black),
            input_focused: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            dialog_border: Style::default().fg(Color::Red),

            axis: Style::default().fg(Color::DarkGray),
            series: Style::default().fg(Color::Blue),
            series_high: Style::default().fg(Color::Magenta),
            average: Style::default().fg(Color::Red),
            trend: Style::default().fg(Color::Green),
            observed: Style::default().fg(Color::Blue),
            expected: Style::default().fg(Color::Magenta),

            table_header: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            table_row: Style::default().fg(Color::Black),
            table_row_alt: Style::default().fg(Color::DarkGray),
            table_total: Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),

            picker_dir: Style::default()
                .fg(Color::Blue)
                .add_modifier(Modifier::BOLD),
            picker_file: Style::default().fg(Color::Black),
            picker_selected: Style::default()
                .fg(Color::White)
                .bg(Color::Blue),
        }
    }

    /// Classic terminal theme using only the basic 8-colour ANSI palette.
    ///
    /// Avoids bold modifiers to maintain a retro aesthetic and maximise
    /// compatibility with minimal terminal emulators.
    pub fn classic() -> Self {
        Self {
            header: Style::default().fg(Color::Cyan),
            header_sparkle: Style::default().fg(Color::White),
            separator: Style::default().fg(Color::DarkGray),
            tab_active: Style::default().fg(Color::Black).bg(Color::White),
            tab_inactive: Style::default().fg(Color::White),

            text: Style::default().fg(Color::White),
            dim: Style::default().fg(Color::DarkGray),
            bold: Style::default().fg(Color::White),
            label: Style::default().fg(Color::Gray),
            value: Style::default().fg(Color::White),

            info: Style::default().fg(Color::Cyan),
            success: Style::default().fg(Color::Green),
            warning: Style::default().fg(Color::Yellow),
            error: Style::default().fg(Color::Red),

            button_key: Style::default().fg(Color::Yellow),
            button: Style::default().fg(Color::White),
            button_disabled: Style::default().fg(Color::DarkGray),
            input: Style::default().fg(Color::White),
            input_focused: Style::default().fg(Color::Cyan),
            dialog_border: Style::default().fg(Color::Red),

            axis: Style::default().fg(Color::White),
            series: Style::default().fg(Color::Cyan),
            series_high: Style::default().fg(Color::Magenta),
            average: Style::default().fg(Color::Red),
            trend: Style::default().fg(Color::Green),
            observed: Style::default().fg(Color::Cyan),
            expected: Style::default().fg(Color::Yellow),

            table_header: Style::default().fg(Color::Cyan),
            table_row: Style::default().fg(Color::White),
            table_row_alt: Style::default().fg(Color::Gray),
            table_total: Style::default().fg(Color::Yellow),

            picker_dir: Style::default().fg(Color::Blue),
            picker_file: Style::default().fg(Color::White),
            picker_selected: Style::default().fg(Color::Black).bg(Color::White),
        }
    }

    /// Choose a theme automatically based on the detected terminal background.
    pub fn auto_detect() -> Self {
        match detect_background() {
            BackgroundType::Light => Self::light(),
            _ => Self::dark(),
        }
    }

    /// Construct a theme by name.  Falls back to `auto_detect` for unknown
    /// names.
    pub fn from_name(name: &str) -> Self {
        match name {
            "light" => Self::light(),
            "dark" => Self::dark(),
            "classic" => Self::classic(),
            _ => Self::auto_detect(),
        }
    }

    // ── Style helpers ────────────────────────────────────────────────────────

    /// Bar style for a month: highlighted at or above the average.
    pub fn bar_style(&self, count: u64, average: f64) -> Style {
        if count as f64 >= average {
            self.series_high
        } else {
            self.series
        }
    }

    pub fn button_style(&self, enabled: bool) -> Style {
        if enabled {
            self.button
        } else {
            self.button_disabled
        }
    }

    /// Input field style; an error outranks focus.
    pub fn input_style(&self, focused: bool, has_error: bool) -> Style {
        if has_error {
            self.error
        } else if focused {
            self.input_focused
        } else {
            self.input
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
