use crate::themes::Theme;
use ratatui::text::{Line, Span};
use tally_core::settings::Tool;

/// Decorative sparkle string placed either side of the application title.
pub const SPARKLES: &str = "✦ ✧ ✦ ✧";

/// Tool header rendering four lines:
///
/// 1. Tool title with sparkle decorations (ALL CAPS).
/// 2. A 60-column `=` separator.
/// 3. Tool tabs in `[ F1 Analyzer | F2 Quantum | F3 Cloud ]` format, active one highlighted.
/// 4. An empty line.
pub struct Header<'a> {
    /// Tool currently shown.
    pub tool: Tool,
    /// Theme providing colour styles for each part of the header.
    pub theme: &'a Theme,
}

impl<'a> Header<'a> {
    /// Construct a new header.
    pub fn new(tool: Tool, theme: &'a Theme) -> Self {
        Self { tool, theme }
    }

    /// Upper-case title for `tool`.
    pub fn title(tool: Tool) -> &'static str {
        match tool {
            Tool::Analyzer => "EMAIL DATE ANALYZER",
            Tool::Quantum => "SCHRÖDINGER'S BOX SIMULATOR",
            Tool::Cloud => "RANDOM POINT CLOUD",
        }
    }

    /// Render the header as a `Vec<Line>` containing exactly four lines.
    pub fn to_lines(&self) -> Vec<Line<'a>> {
        let separator = "=".repeat(60);
        let tab = |tool: Tool, text: &'static str| {
            let style = if tool == self.tool {
                self.theme.tab_active
            } else {
                self.theme.tab_inactive
            };
            Span::styled(text, style)
        };

        vec![
            Line::from(vec![
                Span::styled(SPARKLES, self.theme.header_sparkle),
                Span::styled(format!(" {} ", Self::title(self.tool)), self.theme.header),
                Span::styled(SPARKLES, self.theme.header_sparkle),
            ]),
            Line::from(Span::styled(separator, self.theme.separator)),
            Line::from(vec![
                Span::styled("[ ", self.theme.label),
                tab(Tool::Analyzer, "F1 Analyzer"),
                Span::styled(" | ", self.theme.label),
                tab(Tool::Quantum, "F2 Quantum"),
                Span::styled(" | ", self.theme.label),
                tab(Tool::Cloud, "F3 Cloud"),
                Span::styled(" ]", self.theme.label),
            ]),
            Line::from(""),
        ]
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    #[test]
    fn test_header_to_lines_count() {
        let theme = Theme::dark();
        let lines = Header::new(Tool::Analyzer, &theme).to_lines();
        assert_eq!(lines.len(), 4, "header must produce exactly 4 lines");
    }

    #[test]
    fn test_header_title_follows_tool() {
        let theme = Theme::dark();
        let analyzer = Header::new(Tool::Analyzer, &theme).to_lines();
        let quantum = Header::new(Tool::Quantum, &theme).to_lines();
        let cloud = Header::new(Tool::Cloud, &theme).to_lines();

        assert!(text(&analyzer[0]).contains("EMAIL DATE ANALYZER"));
        assert!(text(&analyzer[0]).contains(SPARKLES));
        assert!(text(&quantum[0]).contains("BOX SIMULATOR"));
        assert!(text(&cloud[0]).contains("RANDOM POINT CLOUD"));
    }

    #[test]
    fn test_header_separator_line() {
        let theme = Theme::dark();
        let lines = Header::new(Tool::Quantum, &theme).to_lines();
        let sep = text(&lines[1]);
        assert_eq!(sep.chars().count(), 60);
        assert!(sep.chars().all(|c| c == '='));
    }

    #[test]
    fn test_header_active_tab_is_highlighted() {
        let theme = Theme::dark();
        let lines = Header::new(Tool::Quantum, &theme).to_lines();
        let tabs = &lines[2].spans;

        assert_eq!(tabs.len(), 7);
        assert_eq!(tabs[1].content, "F1 Analyzer");
        assert_eq!(tabs[1].style, theme.tab_inactive);
        assert_eq!(tabs[3].content, "F2 Quantum");
        assert_eq!(tabs[3].style, theme.tab_active);
        assert_eq!(tabs[5].content, "F3 Cloud");
        assert_eq!(tabs[5].style, theme.tab_inactive);
    }

    #[test]
    fn test_header_empty_fourth_line() {
        let theme = Theme::dark();
        let lines = Header::new(Tool::Analyzer, &theme).to_lines();
        assert!(text(&lines[3]).is_empty());
    }
}
