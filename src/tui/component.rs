use ratatui::Frame;
use ratatui::layout::Rect;

/// A piece of the screen that knows how to draw itself.
///
/// Props live in struct fields and are refreshed by the event loop before
/// each frame. `render` takes `&mut self` so a component can remember
/// layout from the last frame (button hit boxes, scroll offsets, widths).
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// A component that turns terminal events into its own outbound events.
///
/// A returned event is the component's callback firing: at most one per
/// gesture, and only for gestures the user made. Components are driven from
/// the single UI event loop and are not shared across threads.
pub trait EventHandler {
    /// The type of high-level event this component emits.
    type Event;

    /// Handle a low-level `TuiEvent` and optionally return a high-level event.
    fn handle_event(&mut self, event: &super::event::TuiEvent) -> Option<Self::Event>;
}
