use crate::themes::Theme;
use ratatui::text::{Line, Span};

// ── Button ────────────────────────────────────────────────────────────────────

/// A keyboard-triggered control, drawn as `[s] Select Email Text File`.
///
/// Disabled buttons are dimmed but keep their key hint visible.
#[derive(Debug, Clone, Copy)]
pub struct Button<'a> {
    /// Key label shown in brackets, e.g. `"s"` or `"Ctrl+O"`.
    pub key: &'a str,
    pub label: &'a str,
    pub enabled: bool,
}

impl<'a> Button<'a> {
    pub fn new(key: &'a str, label: &'a str) -> Self {
        Self {
            key,
            label,
            enabled: true,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Render the button as spans: key hint, then label.
    pub fn to_spans(&self, theme: &Theme) -> Vec<Span<'a>> {
        let key_style = if self.enabled {
            theme.button_key
        } else {
            theme.button_disabled
        };
        vec![
            Span::styled(format!("[{}]", self.key), key_style),
            Span::raw(" "),
            Span::styled(self.label, theme.button_style(self.enabled)),
        ]
    }
}

// ── ButtonBar ─────────────────────────────────────────────────────────────────

/// A single line of buttons separated by dimmed bars.
pub struct ButtonBar<'a> {
    pub buttons: Vec<Button<'a>>,
    pub theme: &'a Theme,
}

impl<'a> ButtonBar<'a> {
    pub fn new(buttons: Vec<Button<'a>>, theme: &'a Theme) -> Self {
        Self { buttons, theme }
    }

    pub fn to_line(&self) -> Line<'a> {
        let mut spans = Vec::new();
        for (i, button) in self.buttons.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled("  │  ", self.theme.separator));
            }
            spans.extend(button.to_spans(self.theme));
        }
        Line::from(spans)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
