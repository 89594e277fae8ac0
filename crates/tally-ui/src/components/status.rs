use crate::themes::Theme;
use ratatui::{
    layout::{Constraint, Flex, Layout, Rect},
    style::Style,
    text::{Line, Span, Text},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

// ── StatusLine ────────────────────────────────────────────────────────────────

/// Severity of a status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Warning,
    Error,
}

/// One-line message shown at the bottom of a tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub kind: StatusKind,
    pub text: String,
}

impl StatusLine {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Info,
            text: text.into(),
        }
    }

    pub fn success(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Success,
            text: text.into(),
        }
    }

    pub fn warning(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Warning,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: StatusKind::Error,
            text: text.into(),
        }
    }

    fn style(&self, theme: &Theme) -> Style {
        match self.kind {
            StatusKind::Info => theme.info,
            StatusKind::Success => theme.success,
            StatusKind::Warning => theme.warning,
            StatusKind::Error => theme.error,
        }
    }

    /// Format: `"Status: <text>"`.
    pub fn to_line<'a>(&'a self, theme: &Theme) -> Line<'a> {
        Line::from(vec![
            Span::styled("Status: ", theme.label),
            Span::styled(self.text.as_str(), self.style(theme)),
        ])
    }
}

// ── Dialog ────────────────────────────────────────────────────────────────────

/// A modal message box, dismissed with `Esc` or `Enter`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dialog {
    pub title: String,
    pub message: String,
}

impl Dialog {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }

    /// Draw the dialog centred over `area`, clearing what lies beneath.
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup = centered(area, 60, 7);
        let text = Text::from(vec![
            Line::from(Span::styled(self.message.as_str(), theme.text)),
            Line::from(""),
            Line::from(Span::styled("Press Enter or Esc to close", theme.dim)),
        ]);
        let paragraph = Paragraph::new(text).wrap(Wrap { trim: true }).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(theme.dialog_border)
                .title(format!(" {} ", self.title)),
        );
        frame.render_widget(Clear, popup);
        frame.render_widget(paragraph, popup);
    }
}

/// A `width` × `height` rectangle centred in `area`, clamped to fit.
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [cell] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    cell
}

// ── Tests ─────────────────────────────────────────────────────────────────────
