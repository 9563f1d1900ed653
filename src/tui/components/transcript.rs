//! # Transcript Component
//!
//! The chat panel: every conversation entry as a bordered block inside a
//! scroll view that sticks to the bottom while new text streams in.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `TranscriptState` lives in `TuiState` (scroll position)
//! - `Transcript` is created each frame with borrowed state and entries

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::conversation::{Entry, Role};
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub struct TranscriptState {
    pub scroll_state: ScrollViewState,
    /// When true, follow new content at the bottom
    pub stick_to_bottom: bool,
    viewport_height: u16,
    content_height: u16,
}

impl Default for TranscriptState {
    fn default() -> Self {
        Self::new()
    }
}

impl TranscriptState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            stick_to_bottom: true,
            viewport_height: 0,
            content_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Pull an offset left past the end (e.g. by `scroll_to_bottom`) back
    /// onto the content.
    fn clamp(&mut self) {
        let max_y = self.max_offset();
        if self.scroll_state.offset().y > max_y {
            self.scroll_state.set_offset(Position { x: 0, y: max_y });
        }
    }

    /// Clamp to the content and re-pin when the bottom is reached.
    fn settle(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position { x: 0, y: max_y });
        }
    }
}

impl EventHandler for TranscriptState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.clamp();
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageUp => {
                self.clamp();
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.settle();
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.settle();
            }
            _ => {}
        }
        None
    }
}

pub struct Transcript<'a> {
    state: &'a mut TranscriptState,
    entries: &'a [Entry],
    generating: bool,
}

impl<'a> Transcript<'a> {
    pub fn new(state: &'a mut TranscriptState, entries: &'a [Entry], generating: bool) -> Self {
        Self {
            state,
            entries,
            generating,
        }
    }
}

fn role_title(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Assistant => "ronin",
        Role::Notice => "note",
    }
}

fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Cyan),
        Role::Assistant => Style::default().fg(Color::Green),
        Role::Notice => Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    }
}

fn entry_paragraph(entry: &Entry) -> Paragraph<'_> {
    let style = role_style(entry.role);
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(style.add_modifier(Modifier::DIM))
        .title(Line::from(role_title(entry.role)).style(style))
        .title(
            Line::from(entry.at.format("%H:%M").to_string())
                .style(Style::default().fg(Color::DarkGray))
                .right_aligned(),
        )
        .padding(Padding::horizontal(1));
    Paragraph::new(entry.content.as_str())
        .block(block)
        .style(style)
        .wrap(Wrap { trim: false })
}

impl Component for Transcript<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let outer = Block::bordered()
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Ronin Chat ");
        let inner = outer.inner(area);
        frame.render_widget(outer, area);

        if self.entries.is_empty() {
            let hint = Paragraph::new(
                "Select code in the editor and press e, r, t, b or d,\nor type a message below.",
            )
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
            let y = inner.y + inner.height / 2;
            frame.render_widget(hint, Rect::new(inner.x, y, inner.width, 2).intersection(inner));
            return;
        }

        // Leave one column for the scrollbar
        let content_width = inner.width.saturating_sub(1);
        let paragraphs: Vec<(Paragraph, u16)> = self
            .entries
            .iter()
            .map(|entry| {
                let paragraph = entry_paragraph(entry);
                let height = paragraph.line_count(content_width) as u16;
                (paragraph, height)
            })
            .collect();

        let mut total: u16 = paragraphs.iter().map(|(_, h)| *h).sum();
        if self.generating {
            total += 1;
        }
        self.state.content_height = total;
        self.state.viewport_height = inner.height;

        let mut scroll_view = ScrollView::new(Size::new(content_width, total))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y = 0;
        for (paragraph, height) in paragraphs {
            scroll_view.render_widget(paragraph, Rect::new(0, y, content_width, height));
            y += height;
        }
        if self.generating {
            scroll_view.render_widget(
                Line::from("…").style(Style::default().fg(Color::Yellow)),
                Rect::new(1, y, content_width.saturating_sub(1), 1),
            );
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, inner, &mut self.state.scroll_state);
    }
}
