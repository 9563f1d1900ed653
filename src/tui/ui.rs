//! Frame layout and drawing.
//!
//! ```text
//! ┌ title bar ─────────────────────────────────────┐  1 row
//! │ code view          │ transcript                │  rest
//! ├ control bar ───────────────────────────────────┤  1 row
//! │ input field                                    │  3..12 rows
//! └────────────────────────────────────────────────┘
//! ```
//!
//! The main row shows the code view, the transcript, or both side by side,
//! depending on whether a file is open and the chat panel is visible. The
//! model dropdown is drawn last so it sits on top of everything else.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};

use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::Transcript;

/// Where each part of the screen goes for one frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScreenAreas {
    pub title: Rect,
    pub editor: Option<Rect>,
    pub chat: Option<Rect>,
    pub controls: Rect,
    pub input: Rect,
}

pub fn screen_areas(area: Rect, input_height: u16, has_document: bool, chat_visible: bool) -> ScreenAreas {
    use Constraint::{Length, Min, Percentage};
    let [title, main, controls, input] =
        Layout::vertical([Length(1), Min(0), Length(1), Length(input_height)]).areas(area);

    // With no file open the editor pane only shows when there is nothing else
    let (editor, chat) = match (has_document || !chat_visible, chat_visible) {
        (true, true) => {
            let [left, right] =
                Layout::horizontal([Percentage(50), Percentage(50)]).areas(main);
            (Some(left), Some(right))
        }
        (true, false) => (Some(main), None),
        (false, _) => (None, Some(main)),
    };

    ScreenAreas {
        title,
        editor,
        chat,
        controls,
        input,
    }
}

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let screen = frame.area();
    let input_height = tui.input.calculate_height(screen.width);
    let areas = screen_areas(
        screen,
        input_height,
        tui.code_view.has_document(),
        tui.chat_visible,
    );
    tui.areas = areas;

    tui.title_bar.render(frame, areas.title);

    if let Some(area) = areas.editor {
        tui.code_view.render(frame, area);
    }
    if let Some(area) = areas.chat {
        Transcript::new(
            &mut tui.transcript,
            app.conversation.entries(),
            app.conversation.is_generating(),
        )
        .render(frame, area);
    }

    tui.control_bar.render(frame, areas.controls);
    tui.input.render(frame, areas.input);

    tui.control_bar.render_dropdown(frame, screen);
}
