use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq)]
pub enum TuiEvent {
    // Application-level
    ForceQuit, // Ctrl+C
    Escape,
    Resize,
    ToggleFocus,   // Tab: editor ↔ input
    ToggleChat,    // Ctrl+L
    RefreshModels, // F5

    // Control bar
    ActionButton, // Ctrl+R: reset or stop
    Attach,       // Ctrl+O
    OpenModels,   // Ctrl+P

    // Text editing
    Submit,        // Enter
    InsertNewline, // Shift+Enter, Ctrl+J
    InputChar(char),
    Paste(String), // Bracketed paste - preserves newlines
    Backspace,
    Delete,
    CursorLeft,
    CursorRight,
    WordLeft,
    WordRight,
    CursorHome,
    CursorEnd,
    CursorUp,
    CursorDown,

    // Editor selection
    SelectUp,   // Shift+Up
    SelectDown, // Shift+Down

    // Transcript scrolling and mouse
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    MouseMove(u16, u16),
    MouseClick(u16, u16),
}

/// Translate a key press into a `TuiEvent`. Release events are ignored.
pub fn map_key(key: KeyEvent) -> Option<TuiEvent> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);
    let alt = key.modifiers.contains(KeyModifiers::ALT);

    match key.code {
        KeyCode::Char('c') if ctrl => Some(TuiEvent::ForceQuit),
        KeyCode::Char('r') if ctrl => Some(TuiEvent::ActionButton),
        KeyCode::Char('o') if ctrl => Some(TuiEvent::Attach),
        KeyCode::Char('p') if ctrl => Some(TuiEvent::OpenModels),
        KeyCode::Char('l') if ctrl => Some(TuiEvent::ToggleChat),
        // Ctrl+J is ASCII LF; terminals without keyboard enhancement send it for Ctrl+Enter
        KeyCode::Char('j') if ctrl => Some(TuiEvent::InsertNewline),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(TuiEvent::InputChar(c)),
        KeyCode::Enter if shift => Some(TuiEvent::InsertNewline),
        KeyCode::Enter => Some(TuiEvent::Submit),
        KeyCode::Tab => Some(TuiEvent::ToggleFocus),
        KeyCode::Esc => Some(TuiEvent::Escape),
        KeyCode::Backspace => Some(TuiEvent::Backspace),
        KeyCode::Delete => Some(TuiEvent::Delete),
        KeyCode::Left if alt || ctrl => Some(TuiEvent::WordLeft),
        KeyCode::Right if alt || ctrl => Some(TuiEvent::WordRight),
        KeyCode::Left => Some(TuiEvent::CursorLeft),
        KeyCode::Right => Some(TuiEvent::CursorRight),
        KeyCode::Up if shift => Some(TuiEvent::SelectUp),
        KeyCode::Down if shift => Some(TuiEvent::SelectDown),
        KeyCode::Up => Some(TuiEvent::CursorUp),
        KeyCode::Down => Some(TuiEvent::CursorDown),
        KeyCode::Home => Some(TuiEvent::CursorHome),
        KeyCode::End => Some(TuiEvent::CursorEnd),
        KeyCode::PageUp => Some(TuiEvent::ScrollPageUp),
        KeyCode::PageDown => Some(TuiEvent::ScrollPageDown),
        KeyCode::F(5) => Some(TuiEvent::RefreshModels),
        _ => None,
    }
}

/// Translate any terminal event into a `TuiEvent`.
pub fn map_event(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key_event) => {
            log::debug!(
                "Key event: {:?} with modifiers {:?} ({:?})",
                key_event.code,
                key_event.modifiers,
                key_event.kind
            );
            map_key(key_event)
        }
        Event::Mouse(mouse_event) => match mouse_event.kind {
            MouseEventKind::Moved => Some(TuiEvent::MouseMove(mouse_event.column, mouse_event.row)),
            MouseEventKind::Down(MouseButton::Left) => {
                Some(TuiEvent::MouseClick(mouse_event.column, mouse_event.row))
            }
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> std::io::Result<Option<TuiEvent>> {
    poll_event_timeout(std::time::Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`.
pub fn poll_event_timeout(timeout: std::time::Duration) -> std::io::Result<Option<TuiEvent>> {
    if event::poll(timeout)? {
        Ok(map_event(event::read()?))
    } else {
        Ok(None)
    }
}
