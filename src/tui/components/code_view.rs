//! # CodeView Component
//!
//! Read-only view of the file the session was opened on. Stands in for the
//! IDE editor: it has a cursor line and a line-wise selection, and it turns
//! action shortcut keys into `CodeEvent::Trigger` for the host to dispatch.
//!
//! ```text
//! v        start/stop selecting at the cursor line
//! ↑/↓      move the cursor (extends an active selection)
//! Shift+↑↓ select from the cursor
//! a        select the whole file
//! Esc      clear the selection
//! e r t…   trigger the action bound to that key
//! ```

use std::io;
use std::path::{Path, PathBuf};

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::core::prompt_action::EditorSnapshot;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

/// Events emitted by the CodeView.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodeEvent {
    /// A key that may be bound to an editor action was pressed.
    Trigger(char),
}

/// One entry of the action footer: shortcut, label, currently enabled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionHint {
    pub key: char,
    pub label: &'static str,
    pub enabled: bool,
}

pub struct CodeView {
    path: Option<PathBuf>,
    lines: Vec<String>,
    cursor: usize,
    anchor: Option<usize>,
    scroll: usize,
    viewport_height: usize,
    pub focused: bool,
    /// Prop: refreshed by the event loop from each action's `update`.
    pub actions: Vec<ActionHint>,
}

impl CodeView {
    pub fn empty() -> Self {
        Self {
            path: None,
            lines: Vec::new(),
            cursor: 0,
            anchor: None,
            scroll: 0,
            viewport_height: 0,
            focused: false,
            actions: Vec::new(),
        }
    }

    pub fn open(path: &Path) -> io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let mut view = Self::empty();
        view.lines = content.lines().map(str::to_string).collect();
        view.path = Some(path.to_path_buf());
        Ok(view)
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn has_document(&self) -> bool {
        self.path.is_some()
    }

    fn document_name(&self) -> String {
        self.path
            .as_deref()
            .and_then(Path::file_name)
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// Inclusive line range of the selection.
    pub fn selection(&self) -> Option<(usize, usize)> {
        let anchor = self.anchor?;
        Some((anchor.min(self.cursor), anchor.max(self.cursor)))
    }

    /// Exact text of the selected lines, joined with '\n'.
    pub fn selected_text(&self) -> Option<String> {
        let (start, end) = self.selection()?;
        let text = self.lines.get(start..=end)?.join("\n");
        Some(text)
    }

    /// What prompt actions see of this editor. `None` without a document.
    pub fn snapshot(&self) -> Option<EditorSnapshot> {
        self.has_document().then(|| EditorSnapshot {
            document: self.document_name(),
            selected_text: self.selected_text(),
        })
    }

    pub fn clear_selection(&mut self) {
        self.anchor = None;
    }

    fn move_cursor(&mut self, delta: isize) {
        if self.lines.is_empty() {
            return;
        }
        let last = self.lines.len() - 1;
        self.cursor = self.cursor.saturating_add_signed(delta).min(last);
    }

    fn page(&self) -> isize {
        self.viewport_height.max(1) as isize
    }

    /// Adjust `scroll` so the cursor line is visible.
    fn follow_cursor(&mut self, height: usize) {
        if height == 0 {
            return;
        }
        if self.cursor < self.scroll {
            self.scroll = self.cursor;
        } else if self.cursor >= self.scroll + height {
            self.scroll = self.cursor + 1 - height;
        }
    }

    fn footer(&self) -> Line<'static> {
        let mut spans = vec![Span::raw(" ")];
        for hint in &self.actions {
            let style = if hint.enabled {
                Style::default().fg(Color::Yellow)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            spans.push(Span::styled(format!("{} {}", hint.key, hint.label), style));
            spans.push(Span::raw("  "));
        }
        Line::from(spans)
    }
}

impl Component for CodeView {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let title = match self.selection() {
            Some((start, end)) => format!(
                " {} (lines {}-{}) ",
                self.document_name(),
                start + 1,
                end + 1
            ),
            None => format!(" {} ", self.document_name()),
        };
        let mut block = Block::bordered().border_style(border_style).title(title);
        if !self.actions.is_empty() {
            block = block.title_bottom(self.footer());
        }
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if !self.has_document() {
            frame.render_widget(
                Paragraph::new("No file open. Start with --file <path>.")
                    .style(Style::default().fg(Color::DarkGray)),
                inner,
            );
            return;
        }

        let height = inner.height as usize;
        self.viewport_height = height;
        self.follow_cursor(height);

        let gutter = self.lines.len().max(1).to_string().len();
        let selection = self.selection();
        let visible: Vec<Line> = self
            .lines
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(height)
            .map(|(i, text)| {
                let selected = selection.is_some_and(|(s, e)| (s..=e).contains(&i));
                let mut style = Style::default();
                if selected {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                if i == self.cursor && self.focused {
                    style = style.add_modifier(Modifier::BOLD);
                }
                Line::from(vec![
                    Span::styled(
                        format!("{:>gutter$} ", i + 1),
                        Style::default().fg(Color::DarkGray),
                    ),
                    Span::styled(text.as_str(), style),
                ])
            })
            .collect();

        frame.render_widget(Paragraph::new(visible), inner);
    }
}

impl EventHandler for CodeView {
    type Event = CodeEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::CursorUp => self.move_cursor(-1),
            TuiEvent::CursorDown => self.move_cursor(1),
            TuiEvent::ScrollPageUp => self.move_cursor(-self.page()),
            TuiEvent::ScrollPageDown => self.move_cursor(self.page()),
            TuiEvent::CursorHome => self.cursor = 0,
            TuiEvent::CursorEnd => self.move_cursor(isize::MAX),
            TuiEvent::SelectUp | TuiEvent::SelectDown => {
                if self.anchor.is_none() {
                    self.anchor = Some(self.cursor);
                }
                let delta = if *event == TuiEvent::SelectUp { -1 } else { 1 };
                self.move_cursor(delta);
            }
            TuiEvent::Escape => self.clear_selection(),
            TuiEvent::InputChar('v') => {
                self.anchor = match self.anchor {
                    Some(_) => None,
                    None if !self.lines.is_empty() => Some(self.cursor),
                    None => None,
                };
            }
            TuiEvent::InputChar('a') if !self.lines.is_empty() => {
                self.anchor = Some(0);
                self.cursor = self.lines.len() - 1;
            }
            TuiEvent::InputChar(c) => return Some(CodeEvent::Trigger(*c)),
            _ => {}
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::io::Write;

    fn view_of(content: &str) -> (tempfile::NamedTempFile, CodeView) {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        let view = CodeView::open(file.path()).unwrap();
        (file, view)
    }

    #[test]
    fn test_open_missing_file_errors() {
        assert!(CodeView::open(Path::new("/definitely/not/here.rs")).is_err());
    }

    #[test]
    fn test_no_selection_by_default() {
        let (_file, view) = view_of("fn main() {}\n");
        let snapshot = view.snapshot().unwrap();
        assert!(!snapshot.has_selection());
        assert_eq!(snapshot.selected_text, None);
    }

    #[test]
    fn test_empty_view_has_no_snapshot() {
        assert_eq!(CodeView::empty().snapshot(), None);
    }

    #[test]
    fn test_shift_down_selects_lines() {
        let (_file, mut view) = view_of("a\nb\nc\n");
        view.handle_event(&TuiEvent::SelectDown);

        assert_eq!(view.selection(), Some((0, 1)));
        assert_eq!(view.selected_text().as_deref(), Some("a\nb"));
    }

    #[test]
    fn test_v_toggles_and_cursor_extends() {
        let (_file, mut view) = view_of("a\nb\nc\n");
        view.handle_event(&TuiEvent::CursorDown);
        view.handle_event(&TuiEvent::InputChar('v'));
        view.handle_event(&TuiEvent::CursorDown);
        assert_eq!(view.selected_text().as_deref(), Some("b\nc"));

        view.handle_event(&TuiEvent::InputChar('v'));
        assert_eq!(view.selection(), None);
    }

    #[test]
    fn test_selection_upwards_keeps_order() {
        let (_file, mut view) = view_of("a\nb\nc\n");
        view.handle_event(&TuiEvent::CursorEnd);
        view.handle_event(&TuiEvent::SelectUp);
        view.handle_event(&TuiEvent::SelectUp);
        assert_eq!(view.selected_text().as_deref(), Some("a\nb\nc"));
    }

    #[test]
    fn test_select_all_and_escape() {
        let (_file, mut view) = view_of("x\ny\n");
        view.handle_event(&TuiEvent::InputChar('a'));
        assert_eq!(view.selected_text().as_deref(), Some("x\ny"));

        view.handle_event(&TuiEvent::Escape);
        assert_eq!(view.selected_text(), None);
    }

    #[test]
    fn test_cursor_stays_in_bounds() {
        let (_file, mut view) = view_of("only\n");
        view.handle_event(&TuiEvent::CursorUp);
        view.handle_event(&TuiEvent::CursorDown);
        view.handle_event(&TuiEvent::InputChar('v'));
        assert_eq!(view.selection(), Some((0, 0)));
    }

    #[test]
    fn test_other_keys_trigger() {
        let (_file, mut view) = view_of("a\n");
        assert_eq!(
            view.handle_event(&TuiEvent::InputChar('e')),
            Some(CodeEvent::Trigger('e'))
        );
        assert_eq!(view.handle_event(&TuiEvent::CursorDown), None);
    }

    #[test]
    fn test_render_shows_numbers_and_footer() {
        let (_file, mut view) = view_of("let x = 1;\nlet y = 2;\n");
        view.actions = vec![ActionHint {
            key: 'e',
            label: "Explain",
            enabled: false,
        }];

        let mut terminal = Terminal::new(TestBackend::new(40, 6)).unwrap();
        terminal.draw(|f| view.render(f, f.area())).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("1 let x = 1;"));
        assert!(text.contains("2 let y = 2;"));
        assert!(text.contains("e Explain"));
    }

    #[test]
    fn test_cursor_scrolls_into_view() {
        let content: String = (0..50).map(|i| format!("line {i}\n")).collect();
        let (_file, mut view) = view_of(&content);
        let mut terminal = Terminal::new(TestBackend::new(30, 7)).unwrap();
        view.handle_event(&TuiEvent::CursorEnd);
        terminal.draw(|f| view.render(f, f.area())).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("line 49"));
        assert!(!text.contains("line 0 "));
    }
}
