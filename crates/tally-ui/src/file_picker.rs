//! Modal file picker for choosing the email text file.
//!
//! Lists one directory at a time: subdirectories first, then files. By
//! default only `*.txt` files are shown ("Text Files"); `a` toggles
//! "All Files".

use std::fs;
use std::path::{Path, PathBuf};

use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use tracing::warn;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::components::status::centered;
use crate::themes::Theme;

/// One row of the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerEntry {
    pub name: String,
    pub path: PathBuf,
    pub is_dir: bool,
}

/// Result of pressing `Enter` on the highlighted row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickerAction {
    /// Moved into a directory; the picker stays open.
    Entered,
    /// A file was chosen; the picker should close.
    Selected(PathBuf),
    /// Nothing highlighted.
    None,
}

/// Directory browser state.
#[derive(Debug, Clone)]
pub struct FilePicker {
    dir: PathBuf,
    entries: Vec<PickerEntry>,
    selected: usize,
    show_all: bool,
    error: Option<String>,
}

impl FilePicker {
    /// Open the picker in `start`, or in its parent when `start` is a file.
    pub fn open(start: &Path) -> Self {
        let dir = if start.is_dir() {
            start.to_path_buf()
        } else {
            start
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf)
                .unwrap_or_else(|| PathBuf::from("."))
        };
        let mut picker = Self {
            dir,
            entries: Vec::new(),
            selected: 0,
            show_all: false,
            error: None,
        };
        picker.refresh();
        picker
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn entries(&self) -> &[PickerEntry] {
        &self.entries
    }

    pub fn selected(&self) -> Option<&PickerEntry> {
        self.entries.get(self.selected)
    }

    pub fn show_all(&self) -> bool {
        self.show_all
    }

    /// Listing error for the current directory, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Re-read the current directory.
    pub fn refresh(&mut self) {
        self.selected = 0;
        match list_dir(&self.dir, self.show_all) {
            Ok(entries) => {
                self.entries = entries;
                self.error = None;
            }
            Err(e) => {
                warn!("Cannot list {}: {}", self.dir.display(), e);
                self.entries.clear();
                self.error = Some(format!("Cannot list {}: {}", self.dir.display(), e));
            }
        }
    }

    pub fn move_up(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        if self.selected + 1 < self.entries.len() {
            self.selected += 1;
        }
    }

    /// Switch between "Text Files" and "All Files".
    pub fn toggle_filter(&mut self) {
        self.show_all = !self.show_all;
        self.refresh();
    }

    /// Go to the parent directory, if there is one.
    pub fn parent(&mut self) {
        let current = fs::canonicalize(&self.dir).unwrap_or_else(|_| self.dir.clone());
        if let Some(parent) = current.parent() {
            self.dir = parent.to_path_buf();
            self.refresh();
        }
    }

    /// Enter the highlighted directory or choose the highlighted file.
    pub fn activate(&mut self) -> PickerAction {
        let Some(entry) = self.entries.get(self.selected).cloned() else {
            return PickerAction::None;
        };
        if entry.is_dir {
            self.dir = entry.path;
            self.refresh();
            PickerAction::Entered
        } else {
            PickerAction::Selected(entry.path)
        }
    }

    /// Draw the picker as a centred modal over `area`.
    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let popup = centered(area, 70, area.height.saturating_sub(4).max(8));
        frame.render_widget(Clear, popup);

        let filter = if self.show_all {
            "All Files"
        } else {
            "Text Files (*.txt)"
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(" Select Email Text File ")
            .title_bottom(Line::from(vec![
                Span::styled(" ↑/↓ move  Enter open  Backspace up  ", theme.dim),
                Span::styled(format!("a: {filter}"), theme.info),
                Span::styled("  Esc cancel ", theme.dim),
            ]));
        let inner = block.inner(popup);
        frame.render_widget(block, popup);

        let [path_area, list_area] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(1)]).areas(inner);
        frame.render_widget(
            Paragraph::new(Span::styled(
                fit_path(&self.dir.display().to_string(), path_area.width as usize),
                theme.label,
            )),
            path_area,
        );

        if let Some(error) = &self.error {
            frame.render_widget(Paragraph::new(Span::styled(error.as_str(), theme.error)), list_area);
            return;
        }
        if self.entries.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("No matching files here", theme.dim)),
                list_area,
            );
            return;
        }

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .map(|e| {
                if e.is_dir {
                    ListItem::new(Span::styled(format!("{}/", e.name), theme.picker_dir))
                } else {
                    ListItem::new(Span::styled(e.name.as_str(), theme.picker_file))
                }
            })
            .collect();
        let list = List::new(items)
            .highlight_style(theme.picker_selected)
            .highlight_symbol("→ ");
        let mut state = ListState::default().with_selected(Some(self.selected));
        frame.render_stateful_widget(list, list_area, &mut state);
    }
}

/// Directories first, then files, each sorted case-insensitively.
/// Hidden entries are skipped.
fn list_dir(dir: &Path, show_all: bool) -> std::io::Result<Vec<PickerEntry>> {
    let mut dirs = Vec::new();
    let mut files = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if name.starts_with('.') {
            continue;
        }
        let path = entry.path();
        if path.is_dir() {
            dirs.push(PickerEntry {
                name,
                path,
                is_dir: true,
            });
        } else if show_all || is_text_file(&path) {
            files.push(PickerEntry {
                name,
                path,
                is_dir: false,
            });
        }
    }

    dirs.sort_by_key(|e| e.name.to_lowercase());
    files.sort_by_key(|e| e.name.to_lowercase());
    dirs.extend(files);
    Ok(dirs)
}

/// Keep the tail of `path` so it fits in `width` columns, marking the cut
/// with a leading `…`.
pub fn fit_path(path: &str, width: usize) -> String {
    if path.width() <= width {
        return path.to_string();
    }
    let budget = width.saturating_sub(1);
    let mut used = 0;
    let mut tail: Vec<char> = Vec::new();
    for c in path.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        tail.push(c);
    }
    let mut fitted = String::from("…");
    fitted.extend(tail.into_iter().rev());
    fitted
}

fn is_text_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("txt"))
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};
    use tempfile::TempDir;

    fn fixture() -> TempDir {
        let tmp = TempDir::new().expect("tempdir");
        fs::write(tmp.path().join("inbox.txt"), "Date: 1 Jan 2023\n").unwrap();
        fs::write(tmp.path().join("Archive.TXT"), "").unwrap();
        fs::write(tmp.path().join("notes.md"), "").unwrap();
        fs::write(tmp.path().join(".hidden.txt"), "").unwrap();
        fs::create_dir(tmp.path().join("mail")).unwrap();
        fs::write(tmp.path().join("mail").join("old.txt"), "").unwrap();
        tmp
    }

    fn names(picker: &FilePicker) -> Vec<&str> {
        picker.entries().iter().map(|e| e.name.as_str()).collect()
    }

    #[test]
    fn test_lists_dirs_then_text_files() {
        let tmp = fixture();
        let picker = FilePicker::open(tmp.path());
        assert_eq!(names(&picker), vec!["mail", "Archive.TXT", "inbox.txt"]);
        assert!(picker.entries()[0].is_dir);
        assert!(picker.error().is_none());
    }

    #[test]
    fn test_toggle_filter_shows_all_files() {
        let tmp = fixture();
        let mut picker = FilePicker::open(tmp.path());
        picker.toggle_filter();
        assert!(picker.show_all());
        assert_eq!(
            names(&picker),
            vec!["mail", "Archive.TXT", "inbox.txt", "notes.md"]
        );
    }

    #[test]
    fn test_open_on_file_uses_its_directory() {
        let tmp = fixture();
        let picker = FilePicker::open(&tmp.path().join("inbox.txt"));
        assert_eq!(picker.dir(), tmp.path());
    }

    #[test]
    fn test_activate_enters_directory_and_selects_file() {
        let tmp = fixture();
        let mut picker = FilePicker::open(tmp.path());

        assert_eq!(picker.activate(), PickerAction::Entered);
        assert_eq!(names(&picker), vec!["old.txt"]);

        assert_eq!(
            picker.activate(),
            PickerAction::Selected(tmp.path().join("mail").join("old.txt"))
        );
    }

    #[test]
    fn test_navigation_is_clamped() {
        let tmp = fixture();
        let mut picker = FilePicker::open(tmp.path());
        picker.move_up();
        assert_eq!(picker.selected().unwrap().name, "mail");
        for _ in 0..10 {
            picker.move_down();
        }
        assert_eq!(picker.selected().unwrap().name, "inbox.txt");
    }

    #[test]
    fn test_parent_goes_up() {
        let tmp = fixture();
        let mut picker = FilePicker::open(&tmp.path().join("mail"));
        assert_eq!(names(&picker), vec!["old.txt"]);
        picker.parent();
        assert!(names(&picker).contains(&"inbox.txt"));
    }

    #[test]
    fn test_missing_directory_reports_error() {
        let tmp = TempDir::new().expect("tempdir");
        let mut picker = FilePicker::open(tmp.path());
        picker.dir = tmp.path().join("gone");
        picker.refresh();
        assert!(picker.entries().is_empty());
        assert!(picker.error().is_some());
        assert_eq!(picker.activate(), PickerAction::None);
    }

    #[test]
    fn test_fit_path_keeps_tail() {
        assert_eq!(fit_path("/home/a", 20), "/home/a");
        assert_eq!(fit_path("/home/user/mail", 8), "…er/mail");
        assert_eq!(fit_path("/data/日本語", 7), "…日本語");
        assert_eq!(fit_path("/x", 0), "…");
    }

    #[test]
    fn test_render_does_not_panic_and_shows_entries() {
        let tmp = fixture();
        let picker = FilePicker::open(tmp.path());
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        let theme = Theme::dark();

        terminal
            .draw(|frame| {
                let area = frame.area();
                picker.render(frame, area, &theme);
            })
            .unwrap();

        let content: String = terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(content.contains("Select Email Text File"));
        assert!(content.contains("inbox.txt"));
        assert!(content.contains("mail/"));
    }
}
