//! Cursor and scroll tracking for the InputField.
//!
//! The text itself is owned by `InputField`; every method here takes the
//! buffer as `&str` so the dependency stays visible at call sites.

use super::text_wrap::{
    BORDER_OFFSET, MAX_VISIBLE_LINES, inner_width, wrap_line_count, wrap_options,
};
use ratatui::layout::Rect;

pub(super) struct CursorState {
    /// Byte offset into the buffer (0..=buffer.len()), always on a char boundary
    pub pos: usize,
    /// First visible wrapped line; non-zero only once content exceeds the cap
    pub scroll_offset: u16,
    /// Outer width seen on the last render, used by vertical movement
    pub last_content_width: u16,
}

impl CursorState {
    const DEFAULT_WIDTH: u16 = 80;

    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_offset: 0,
            last_content_width: Self::DEFAULT_WIDTH,
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_offset = 0;
    }

    /// Move one wrapped line up (`direction < 0`) or down, keeping the column
    /// where the target line is long enough.
    ///
    /// Returns `false` at the first/last line.
    pub fn move_vertically(&mut self, buffer: &str, direction: i16, content_width: u16) -> bool {
        let width = inner_width(content_width);
        if width == 0 || buffer.is_empty() {
            return false;
        }

        let lines = textwrap::wrap(buffer, wrap_options(width));
        if lines.is_empty() {
            return false;
        }

        // Bytes a wrapped line spans in the buffer, counting a newline that ends it
        let span = |line: &str, start: usize| -> usize {
            let end = start + line.len();
            line.len() + usize::from(end < buffer.len() && buffer.as_bytes()[end] == b'\n')
        };

        let mut start = 0;
        let mut current = 0;
        let mut column = 0;
        for (idx, line) in lines.iter().enumerate() {
            if start + line.len() >= self.pos {
                current = idx;
                column = self.pos - start;
                break;
            }
            start += span(line, start);
        }

        let target = match direction {
            d if d < 0 && current > 0 => current - 1,
            d if d > 0 && current + 1 < lines.len() => current + 1,
            _ => return false,
        };

        let target_start = lines
            .iter()
            .take(target)
            .fold(0, |offset, line| offset + span(line, offset));

        let target_line = &lines[target];
        let mut column = column.min(target_line.len());
        while !target_line.is_char_boundary(column) {
            column -= 1;
        }
        self.pos = target_start + column;

        true
    }

    /// Wrapped line (0-based) the cursor sits on.
    pub fn calculate_line(&self, buffer: &str, content_width: u16) -> u16 {
        let width = inner_width(content_width);
        if width == 0 {
            return 0;
        }

        let before = &buffer[..self.pos];
        let lines = textwrap::wrap(before, wrap_options(width));
        let mut line = lines.len().saturating_sub(1) as u16;

        // textwrap drops the empty line that follows a trailing newline
        if self.pos > 0
            && buffer.as_bytes()[self.pos - 1] == b'\n'
            && !lines.last().is_some_and(|l| l.is_empty())
        {
            line += 1;
        }

        line
    }

    /// Keep the cursor line inside the visible window.
    pub fn update_scroll_offset(&mut self, buffer: &str, content_width: u16) {
        let total = wrap_line_count(buffer, inner_width(content_width));
        if total <= MAX_VISIBLE_LINES {
            self.scroll_offset = 0;
            return;
        }

        let line = self.calculate_line(buffer, content_width);
        if line < self.scroll_offset {
            self.scroll_offset = line;
        } else if line >= self.scroll_offset + MAX_VISIBLE_LINES {
            self.scroll_offset = line + 1 - MAX_VISIBLE_LINES;
        }
    }

    /// Screen (column, row) of the cursor inside `area`.
    pub fn screen_pos(&self, buffer: &str, area: Rect) -> (u16, u16) {
        let origin = (area.x + BORDER_OFFSET, area.y + BORDER_OFFSET);
        let width = inner_width(area.width);
        if width == 0 {
            return origin;
        }

        let options = wrap_options(width);
        let before = &buffer[..self.pos];
        let line = self.calculate_line(buffer, area.width);

        // Column comes from the logical line, since textwrap trims trailing spaces
        let logical_start = before.rfind('\n').map(|i| i + 1).unwrap_or(0);
        let logical = &before[logical_start..];
        let segments = textwrap::wrap(logical, options);
        let column = match segments.split_last() {
            None => 0,
            Some((_, earlier)) => {
                let consumed: usize = earlier.iter().map(|s| s.chars().count()).sum();
                (logical.chars().count() - consumed) as u16
            }
        };

        let row = line.saturating_sub(self.scroll_offset);
        (origin.0 + column, origin.1 + row)
    }
}
