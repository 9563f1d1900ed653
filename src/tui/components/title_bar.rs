//! # TitleBar Component
//!
//! Top status line: application name, project, model and the transient
//! status message.
//!
//! Purely presentational. Every field is a prop refreshed by the event loop
//! before each frame:
//!
//! ```text
//! Ronin Chat [ronin] (model: qwen2.5-coder) | Attached src/lib.rs
//! ```
//!
//! When no model has been resolved yet, `(model: none)` is shown rather than
//! hiding the segment, so it is obvious the responder will run without one.

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

pub struct TitleBar {
    pub project_name: String,
    pub model_name: Option<String>,
    pub status_message: String,
    /// A generation is running
    pub busy: bool,
}

impl TitleBar {
    pub fn new(project_name: String) -> Self {
        Self {
            project_name,
            model_name: None,
            status_message: String::new(),
            busy: false,
        }
    }

    fn title_text(&self) -> String {
        let model = self.model_name.as_deref().unwrap_or("none");
        if self.status_message.is_empty() {
            format!("Ronin Chat [{}] (model: {})", self.project_name, model)
        } else {
            format!(
                "Ronin Chat [{}] (model: {}) | {}",
                self.project_name, model, self.status_message
            )
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(self.title_text())];
        if self.busy {
            spans.push(Span::styled(" ●", Style::default().fg(Color::Yellow)));
        }
        frame.render_widget(Line::from(spans), area);
    }
}
