//! # ControlBar Component
//!
//! One row above the input field: the model selector on the left, the
//! reset/stop and attach buttons on the right, and the tooltip of whichever
//! control the mouse is over in between.
//!
//! ```text
//!  qwen2.5-coder ▾        Stop Generation        [■ Stop] [+ Attach]
//! ```
//!
//! ## Events out
//!
//! - `ActionButtonClick`: Ctrl+R or a click on the action button. The host
//!   decides whether that means reset or stop.
//! - `AttachClick`: Ctrl+O or a click on the attach button.
//! - `ModelChange(name)`: the user confirmed a different entry in the
//!   dropdown. Programmatic updates never emit.
//!
//! ## State in
//!
//! - `update_models`: wholesale replace of the list.
//! - `set_models_loading`: placeholder entry + disabled selector while true.
//! - `set_generating`: swaps the action button's icon and tooltip. Display only.
//!
//! The dropdown is an overlay drawn by `render_dropdown` after the rest of the
//! frame, so it can cover the transcript above the bar.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};
use unicode_width::UnicodeWidthStr;

use crate::core::models::ModelList;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

pub const LOADING_PLACEHOLDER: &str = "Loading...";
pub const RESET_TOOLTIP_INITIAL: &str = "Reset Chat";
pub const RESET_TOOLTIP: &str = "Reset Chat (Keep Settings)";
pub const STOP_TOOLTIP: &str = "Stop Generation";
pub const ATTACH_TOOLTIP: &str = "Attach File";
const SELECTOR_TOOLTIP: &str = "Select Model (Ctrl+P)";

const RESET_ICON: &str = "↻";
const STOP_ICON: &str = "■";
const ATTACH_ICON: &str = "+";

const DROPDOWN_MAX_ROWS: u16 = 8;
const DROPDOWN_MIN_WIDTH: u16 = 24;

/// Events emitted by the ControlBar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlEvent {
    ActionButtonClick,
    AttachClick,
    ModelChange(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    ModelSelector,
    ActionButton,
    AttachButton,
}

/// Screen rectangles from the last render, for mouse hit testing.
#[derive(Debug, Default, Clone, Copy)]
struct HitBoxes {
    selector: Rect,
    action: Rect,
    attach: Rect,
    dropdown: Rect,
}

pub struct ControlBar {
    models: ModelList,
    selector_enabled: bool,
    /// The list holds only the loading placeholder, which is never emitted.
    showing_placeholder: bool,
    generating: bool,
    action_icon: &'static str,
    action_label: &'static str,
    action_tooltip: &'static str,
    dropdown: Option<ListState>,
    hovered: Option<Control>,
    hit: HitBoxes,
}

impl Default for ControlBar {
    fn default() -> Self {
        Self::new()
    }
}

impl ControlBar {
    pub fn new() -> Self {
        Self {
            models: ModelList::new(),
            selector_enabled: true,
            showing_placeholder: false,
            generating: false,
            action_icon: RESET_ICON,
            action_label: "Reset",
            action_tooltip: RESET_TOOLTIP_INITIAL,
            dropdown: None,
            hovered: None,
            hit: HitBoxes::default(),
        }
    }

    /// Replace the dropdown contents.
    ///
    /// `selected` is kept if it is in `models`, otherwise the first entry is
    /// selected, otherwise nothing is.
    pub fn update_models(&mut self, models: Vec<String>, selected: Option<&str>) {
        self.models.replace(models, selected);
        self.showing_placeholder = false;
        self.dropdown = None;
    }

    /// While loading, the list is a single disabled placeholder. Turning loading
    /// off re-enables the selector but does not restore the previous list.
    pub fn set_models_loading(&mut self, loading: bool) {
        if loading {
            self.models
                .replace(vec![LOADING_PLACEHOLDER.to_string()], None);
            self.showing_placeholder = true;
            self.selector_enabled = false;
            self.dropdown = None;
        } else {
            self.selector_enabled = true;
        }
    }

    pub fn set_generating(&mut self, generating: bool) {
        self.generating = generating;
        if generating {
            self.action_icon = STOP_ICON;
            self.action_label = "Stop";
            self.action_tooltip = STOP_TOOLTIP;
        } else {
            self.action_icon = RESET_ICON;
            self.action_label = "Reset";
            self.action_tooltip = RESET_TOOLTIP;
        }
    }

    pub fn models(&self) -> &ModelList {
        &self.models
    }

    /// The selected model, or `None` while only the placeholder is shown.
    pub fn selected_model(&self) -> Option<&str> {
        if self.showing_placeholder {
            None
        } else {
            self.models.selected()
        }
    }

    pub fn is_selector_enabled(&self) -> bool {
        self.selector_enabled
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn action_tooltip(&self) -> &'static str {
        self.action_tooltip
    }

    pub fn action_icon(&self) -> &'static str {
        self.action_icon
    }

    pub fn is_dropdown_open(&self) -> bool {
        self.dropdown.is_some()
    }

    fn open_dropdown(&mut self) {
        if !self.selector_enabled || self.models.is_empty() {
            return;
        }
        let mut state = ListState::default();
        state.select(Some(self.models.selected_index().unwrap_or(0)));
        self.dropdown = Some(state);
    }

    fn tooltip(&self, control: Control) -> &'static str {
        match control {
            Control::ModelSelector => SELECTOR_TOOLTIP,
            Control::ActionButton => self.action_tooltip,
            Control::AttachButton => ATTACH_TOOLTIP,
        }
    }

    fn hit_test(&self, column: u16, row: u16) -> Option<Control> {
        let pos = Position::new(column, row);
        if self.hit.action.contains(pos) {
            Some(Control::ActionButton)
        } else if self.hit.attach.contains(pos) {
            Some(Control::AttachButton)
        } else if self.hit.selector.contains(pos) {
            Some(Control::ModelSelector)
        } else {
            None
        }
    }

    /// Close the dropdown and emit `ModelChange` if `index` differs from the selection.
    fn confirm(&mut self, index: usize) -> Option<ControlEvent> {
        self.dropdown = None;
        if self.showing_placeholder || self.models.selected_index() == Some(index) {
            return None;
        }
        if !self.models.select_index(index) {
            return None;
        }
        self.models
            .selected()
            .map(|name| ControlEvent::ModelChange(name.to_string()))
    }

    fn handle_dropdown_event(&mut self, event: &TuiEvent) -> Option<ControlEvent> {
        let len = self.models.len();
        let highlighted = self
            .dropdown
            .as_ref()
            .and_then(ListState::selected)
            .unwrap_or(0);

        match event {
            TuiEvent::CursorUp => {
                self.highlight(highlighted.saturating_sub(1));
                None
            }
            TuiEvent::CursorDown => {
                self.highlight((highlighted + 1).min(len.saturating_sub(1)));
                None
            }
            TuiEvent::Submit => self.confirm(highlighted),
            TuiEvent::MouseClick(column, row)
                if self.hit.dropdown.contains(Position::new(*column, *row)) =>
            {
                let first_row = self.hit.dropdown.y + 1;
                let offset = self.dropdown.as_ref().map(ListState::offset).unwrap_or(0);
                if *row < first_row {
                    return None;
                }
                let index = offset + (*row - first_row) as usize;
                if index < len { self.confirm(index) } else { None }
            }
            TuiEvent::MouseClick(..) => {
                self.dropdown = None;
                self.handle_bar_event(event)
            }
            TuiEvent::Escape | TuiEvent::OpenModels => {
                self.dropdown = None;
                None
            }
            TuiEvent::MouseMove(..) => self.handle_bar_event(event),
            _ => None,
        }
    }

    fn highlight(&mut self, index: usize) {
        if let Some(state) = &mut self.dropdown {
            state.select(Some(index));
        }
    }

    fn handle_bar_event(&mut self, event: &TuiEvent) -> Option<ControlEvent> {
        match event {
            TuiEvent::ActionButton => Some(ControlEvent::ActionButtonClick),
            TuiEvent::Attach => Some(ControlEvent::AttachClick),
            TuiEvent::OpenModels => {
                self.open_dropdown();
                None
            }
            TuiEvent::MouseMove(column, row) => {
                self.hovered = self.hit_test(*column, *row);
                None
            }
            TuiEvent::MouseClick(column, row) => match self.hit_test(*column, *row)? {
                Control::ActionButton => Some(ControlEvent::ActionButtonClick),
                Control::AttachButton => Some(ControlEvent::AttachClick),
                Control::ModelSelector => {
                    self.open_dropdown();
                    None
                }
            },
            _ => None,
        }
    }

    /// Draw the open dropdown, anchored to the selector. No-op when closed.
    pub fn render_dropdown(&mut self, frame: &mut Frame, screen: Rect) {
        let Some(state) = self.dropdown.as_mut() else {
            return;
        };

        let rows = (self.models.len() as u16).min(DROPDOWN_MAX_ROWS);
        let height = (rows + 2).min(screen.height);
        let widest = self
            .models
            .names()
            .iter()
            .map(|n| n.width() as u16)
            .max()
            .unwrap_or(0);
        let width = (widest + 6).max(DROPDOWN_MIN_WIDTH).min(screen.width);

        let anchor = self.hit.selector;
        let y = if anchor.y >= screen.y + height {
            anchor.y - height
        } else {
            anchor.y + 1
        };
        let x = anchor.x.min(screen.right().saturating_sub(width));
        let area = Rect::new(x, y, width, height).intersection(screen);
        self.hit.dropdown = area;

        let current = self.models.selected_index();
        let items: Vec<ListItem> = self
            .models
            .names()
            .iter()
            .enumerate()
            .map(|(i, name)| {
                let marker = if Some(i) == current { " *" } else { "" };
                ListItem::new(format!("{name}{marker}"))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(" Models ")
                    .title_bottom(Line::from(" Enter Select  Esc Back ").centered()),
            )
            .highlight_style(Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED));

        frame.render_widget(Clear, area);
        frame.render_stateful_widget(list, area, state);
    }
}

impl Component for ControlBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let action_text = format!("[{} {}]", self.action_icon, self.action_label);
        let attach_text = format!("[{ATTACH_ICON} Attach]");
        let action_width = action_text.width() as u16;
        let attach_width = attach_text.width() as u16;

        let attach = Rect::new(
            area.right().saturating_sub(attach_width),
            area.y,
            attach_width.min(area.width),
            area.height.min(1),
        );
        let action = Rect::new(
            attach.x.saturating_sub(action_width + 1),
            area.y,
            action_width.min(attach.x.saturating_sub(area.x)),
            area.height.min(1),
        );

        let selector_label = match self.models.selected() {
            Some(name) => format!(" {name} ▾"),
            None => " No models ▾".to_string(),
        };
        let max_selector = (area.width / 2).max(1) as usize;
        let selector_label = truncate_to_width(&selector_label, max_selector);
        let selector = Rect::new(
            area.x,
            area.y,
            selector_label.width() as u16,
            area.height.min(1),
        );

        self.hit.selector = selector;
        self.hit.action = action;
        self.hit.attach = attach;

        let selector_style = if self.selector_enabled {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let action_style = if self.generating {
            Style::default().fg(Color::Red)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let hover = |control: Control, style: Style| {
            if self.hovered == Some(control) {
                style.add_modifier(Modifier::REVERSED)
            } else {
                style
            }
        };

        frame.render_widget(
            Span::styled(selector_label, hover(Control::ModelSelector, selector_style)),
            selector,
        );
        frame.render_widget(
            Span::styled(action_text, hover(Control::ActionButton, action_style)),
            action,
        );
        frame.render_widget(
            Span::styled(
                attach_text,
                hover(Control::AttachButton, Style::default().fg(Color::Gray)),
            ),
            attach,
        );

        if let Some(control) = self.hovered {
            let middle = Rect::new(
                selector.right() + 1,
                area.y,
                action.x.saturating_sub(selector.right() + 2),
                area.height.min(1),
            );
            if middle.width > 0 {
                frame.render_widget(
                    Line::from(self.tooltip(control))
                        .style(Style::default().fg(Color::DarkGray))
                        .centered(),
                    middle,
                );
            }
        }
    }
}

impl EventHandler for ControlBar {
    type Event = ControlEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.dropdown.is_some() {
            self.handle_dropdown_event(event)
        } else {
            self.handle_bar_event(event)
        }
    }
}

/// Cut `s` to at most `max_width` display columns, ending in "…" if cut.
fn truncate_to_width(s: &str, max_width: usize) -> String {
    if s.width() <= max_width {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = unicode_width::UnicodeWidthChar::width(c).unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
