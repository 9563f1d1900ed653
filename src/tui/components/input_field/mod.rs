//! # InputField Component
//!
//! Multi-line message entry for the chat panel.
//!
//! ## Responsibilities
//!
//! - Capture text input, paste and editing keys
//! - Enter submits; Shift+Enter inserts a newline
//! - Grow with content from 1 to 10 visible lines, then scroll
//! - Ignore input while disabled, and ask for focus when re-enabled
//!
//! ## Submission
//!
//! On submit the buffer is trimmed. Non-empty text is emitted once as
//! `InputEvent::SendMessage` and the buffer is cleared. Empty or
//! whitespace-only text emits nothing and leaves the buffer as it was.

mod cursor;
mod text_wrap;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::CursorState;
use text_wrap::{
    MAX_VISIBLE_LINES, VERTICAL_OVERHEAD, clamp_visible, inner_width, next_char_boundary,
    next_word_boundary, prev_char_boundary, prev_word_boundary, wrap_line_count, wrap_options,
};

pub const PLACEHOLDER: &str = "Type your message... (Enter to send, Shift+Enter for new line)";

/// Events emitted by the InputField
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Trimmed, non-empty text the user submitted
    SendMessage(String),
    /// The buffer or cursor changed
    ContentChanged,
}

/// Text entry with auto-height.
///
/// # Props
///
/// - `focused`: whether keyboard focus is on this field (set by the event loop)
///
/// # State
///
/// - `buffer`: current text
/// - `cursor`: cursor position and scroll offset (see `CursorState`)
/// - `enabled`: disabled fields ignore editing and submission
pub struct InputField {
    buffer: String,
    cursor: CursorState,
    enabled: bool,
    focus_requested: bool,
    pub focused: bool,
}

impl Default for InputField {
    fn default() -> Self {
        Self::new()
    }
}

impl InputField {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: CursorState::new(),
            enabled: true,
            focus_requested: false,
            focused: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Replace the buffer, moving the cursor to the end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.buffer = text.into();
        self.cursor.pos = self.buffer.len();
        self.cursor.scroll_offset = 0;
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable the field. Enabling also requests keyboard focus.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if enabled {
            self.focus_requested = true;
        }
    }

    /// Returns `true` once after `set_enabled(true)`; the event loop moves focus here.
    pub fn take_focus_request(&mut self) -> bool {
        std::mem::take(&mut self.focus_requested)
    }

    /// Wrapped line count for `content_width`, clamped to the visible range.
    pub fn visible_lines(&self, content_width: u16) -> u16 {
        clamp_visible(wrap_line_count(&self.buffer, inner_width(content_width)))
    }

    /// Rows the field needs at `content_width`, borders included.
    pub fn calculate_height(&self, content_width: u16) -> u16 {
        self.visible_lines(content_width) + VERTICAL_OVERHEAD
    }

    fn submit(&mut self) -> Option<InputEvent> {
        let message = self.buffer.trim();
        if message.is_empty() {
            return None;
        }
        let message = message.to_string();
        self.buffer.clear();
        self.cursor.reset();
        Some(InputEvent::SendMessage(message))
    }

    fn insert(&mut self, text: &str) -> Option<InputEvent> {
        self.buffer.insert_str(self.cursor.pos, text);
        self.cursor.pos += text.len();
        Some(InputEvent::ContentChanged)
    }

    /// Move the cursor to `pos`, reporting a change only if it moved.
    fn move_to(&mut self, pos: usize) -> Option<InputEvent> {
        (pos != self.cursor.pos).then(|| {
            self.cursor.pos = pos;
            InputEvent::ContentChanged
        })
    }

    fn visible_text(&self, content_width: u16) -> String {
        if self.cursor.scroll_offset == 0 {
            return self.buffer.clone();
        }

        let width = inner_width(content_width);
        if width == 0 {
            return String::new();
        }

        let lines = textwrap::wrap(&self.buffer, wrap_options(width));
        let start = self.cursor.scroll_offset as usize;
        let end = (start + MAX_VISIBLE_LINES as usize).min(lines.len());
        lines[start.min(end)..end].join("\n")
    }

    fn render_scrollbar(&self, frame: &mut Frame, area: Rect) {
        use ratatui::widgets::{Scrollbar, ScrollbarOrientation, ScrollbarState};

        let total = wrap_line_count(&self.buffer, inner_width(area.width));
        if total <= MAX_VISIBLE_LINES {
            return;
        }

        // content_length is the last scroll position, not the line count
        let mut state = ScrollbarState::default()
            .content_length(total.saturating_sub(MAX_VISIBLE_LINES) as usize)
            .position(self.cursor.scroll_offset as usize);

        let scrollbar_area = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };

        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            scrollbar_area,
            &mut state,
        );
    }
}

impl Component for InputField {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.cursor.last_content_width = area.width;
        self.cursor.update_scroll_offset(&self.buffer, area.width);

        let (title, border_style) = match (self.enabled, self.focused) {
            (false, _) => (" Message (waiting for reply) ", Style::default().fg(Color::DarkGray)),
            (true, true) => (" Message ", Style::default().fg(Color::Green)),
            (true, false) => (" Message ", Style::default().add_modifier(Modifier::DIM)),
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title);

        let paragraph = if self.buffer.is_empty() {
            Paragraph::new(PLACEHOLDER).style(Style::default().fg(Color::DarkGray))
        } else {
            let style = if self.enabled {
                Style::default()
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Paragraph::new(self.visible_text(area.width)).style(style)
        };

        frame.render_widget(paragraph.block(block), area);
        self.render_scrollbar(frame, area);

        if self.focused && self.enabled {
            frame.set_cursor_position(self.cursor.screen_pos(&self.buffer, area));
        }
    }
}

impl EventHandler for InputField {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if !self.enabled {
            return None;
        }
        match event {
            TuiEvent::Submit => self.submit(),
            TuiEvent::InsertNewline => self.insert("\n"),
            TuiEvent::InputChar(c) => self.insert(c.encode_utf8(&mut [0; 4])),
            TuiEvent::Paste(text) => self.insert(text),
            TuiEvent::Backspace => {
                if self.cursor.pos == 0 {
                    return None;
                }
                let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(prev..self.cursor.pos);
                self.cursor.pos = prev;
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Delete => {
                if self.cursor.pos >= self.buffer.len() {
                    return None;
                }
                let next = next_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(self.cursor.pos..next);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::CursorLeft if self.cursor.pos > 0 => {
                self.move_to(prev_char_boundary(&self.buffer, self.cursor.pos))
            }
            TuiEvent::CursorRight if self.cursor.pos < self.buffer.len() => {
                self.move_to(next_char_boundary(&self.buffer, self.cursor.pos))
            }
            TuiEvent::WordLeft => self.move_to(prev_word_boundary(&self.buffer, self.cursor.pos)),
            TuiEvent::WordRight => self.move_to(next_word_boundary(&self.buffer, self.cursor.pos)),
            TuiEvent::CursorHome => {
                let line_start = self.buffer[..self.cursor.pos]
                    .rfind('\n')
                    .map(|i| i + 1)
                    .unwrap_or(0);
                self.move_to(line_start)
            }
            TuiEvent::CursorEnd => {
                let line_end = self.buffer[self.cursor.pos..]
                    .find('\n')
                    .map(|i| self.cursor.pos + i)
                    .unwrap_or(self.buffer.len());
                self.move_to(line_end)
            }
            TuiEvent::CursorUp => self
                .cursor
                .move_vertically(&self.buffer, -1, self.cursor.last_content_width)
                .then_some(InputEvent::ContentChanged),
            TuiEvent::CursorDown => self
                .cursor
                .move_vertically(&self.buffer, 1, self.cursor.last_content_width)
                .then_some(InputEvent::ContentChanged),
            _ => None,
        }
    }
}
