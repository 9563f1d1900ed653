//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates terminal events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event routing
//!
//! Each terminal event goes to exactly one place:
//!
//! 1. An open model dropdown takes everything.
//! 2. Global keys: quit, focus, chat toggle, model refresh, control bar keys,
//!    mouse, and transcript scrolling.
//! 3. The focused pane: the code view (action shortcuts) or the input field.
//!
//! Components answer with event values; this loop turns them into `Action`s
//! for `update()` and carries out the returned `Effect`.
//!
//! ## Redraw Strategy
//!
//! Draws only after an event or a background message. While a reply is
//! streaming or models are loading the poll timeout drops to ~80ms so the
//! busy marker stays current; otherwise the loop sleeps up to 500ms.

mod chat_surface;
mod component;
mod components;
mod event;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::path::Path;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::cursor::{SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;
use ratatui::layout::Position;

use crate::core::action::{Action, Effect, update};
use crate::core::config::ResolvedConfig;
use crate::core::models::{HttpCatalog, ModelCatalog, StaticCatalog};
use crate::core::prompt_action::{ActionContext, PromptAction, builtin_actions};
use crate::core::responder::{self, ResponderRequest};
use crate::core::state::App;
use crate::tui::chat_surface::ChatSurface;
use crate::tui::component::EventHandler;
use crate::tui::components::{
    ActionHint, CodeEvent, CodeView, ControlBar, ControlEvent, InputEvent, InputField, TitleBar,
    TranscriptState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::ui::ScreenAreas;

/// Which pane receives keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    Input,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub code_view: CodeView,
    pub transcript: TranscriptState,
    pub input: InputField,
    pub control_bar: ControlBar,
    pub title_bar: TitleBar,
    pub focus: Focus,
    pub chat_visible: bool,
    pub actions: Vec<Box<dyn PromptAction>>,
    /// Layout of the last drawn frame, for mouse focus changes
    pub areas: ScreenAreas,
}

impl TuiState {
    pub fn new(app: &App, code_view: CodeView, chat_visible: bool) -> Self {
        // Start where the user can act: the file if one is open, else the input
        let focus = if code_view.has_document() {
            Focus::Editor
        } else {
            Focus::Input
        };
        Self {
            code_view,
            transcript: TranscriptState::new(),
            input: InputField::new(),
            control_bar: ControlBar::new(),
            title_bar: TitleBar::new(app.project.name.clone()),
            focus,
            chat_visible,
            actions: builtin_actions(),
            areas: ScreenAreas::default(),
        }
    }

    fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Input if self.code_view.has_document() => Focus::Editor,
            _ => Focus::Input,
        };
    }

    /// Copy App state into component props before a frame is drawn.
    pub fn sync(&mut self, app: &App) {
        let generating = app.conversation.is_generating();
        if generating != self.control_bar.is_generating() {
            self.control_bar.set_generating(generating);
            self.input.set_enabled(!generating);
        }
        if self.input.take_focus_request() {
            self.focus = Focus::Input;
        }
        self.input.focused = self.focus == Focus::Input;
        self.code_view.focused = self.focus == Focus::Editor;

        let snapshot = self.code_view.snapshot();
        let ctx = ActionContext {
            project: Some(&app.project),
            editor: snapshot.as_ref().filter(|_| self.focus == Focus::Editor),
        };
        self.code_view.actions = self
            .actions
            .iter()
            .filter_map(|action| {
                Some(ActionHint {
                    key: action.shortcut()?,
                    label: action.label(),
                    enabled: action.update(&ctx).enabled_and_visible,
                })
            })
            .collect();

        self.title_bar.model_name = app.model_name.clone();
        self.title_bar.status_message = app.status_message.clone();
        self.title_bar.busy = generating || app.models_loading;
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter through; terminals that
        // don't speak it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste
        );
    }
}

/// Build the model catalog: HTTP when a URL is configured, else the config list.
pub fn build_catalog(config: &ResolvedConfig) -> Arc<dyn ModelCatalog> {
    match &config.catalog_url {
        Some(url) => Arc::new(HttpCatalog::new(
            url.clone(),
            config.catalog_api_key.clone(),
        )),
        None => Arc::new(StaticCatalog::new(config.models.clone())),
    }
}

fn open_code_view(path: Option<&Path>, app: &mut App) -> CodeView {
    let Some(path) = path else {
        return CodeView::empty();
    };
    match CodeView::open(path) {
        Ok(view) => {
            info!("Opened {}", path.display());
            view
        }
        Err(e) => {
            warn!("Could not open {}: {}", path.display(), e);
            app.status_message = format!("Could not open {}: {e}", path.display());
            CodeView::empty()
        }
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    let catalog = build_catalog(&config);
    let mut app = App::from_config(&config);
    let code_view = open_code_view(config.file.as_deref(), &mut app);
    let mut tui = TuiState::new(&app, code_view, config.show_chat);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();

    let mut responder_handle: Option<tokio::task::AbortHandle> = None;

    let effect = update(&mut app, Action::RefreshModels);
    apply_effect(effect, &mut tui, &catalog, &tx, &mut responder_handle);

    let mut needs_redraw = true;

    loop {
        // Start the next queued prompt once the previous reply has finished
        if let Some(request) = app.take_responder_request() {
            responder_handle = Some(spawn_responder(request, tx.clone()));
            needs_redraw = true;
        }

        tui.sync(&app);

        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let busy = app.conversation.is_generating() || app.models_loading;
        let timeout = if busy {
            Duration::from_millis(80)
        } else {
            Duration::from_millis(500)
        };

        // Process the first event and everything already queued behind it
        let mut should_quit = false;
        let mut next = poll_event_timeout(timeout)?;
        while let Some(event) = next {
            needs_redraw = true;
            if let Some(action) = route_event(&event, &mut app, &mut tui) {
                let effect = update(&mut app, action);
                if apply_effect(effect, &mut tui, &catalog, &tx, &mut responder_handle) {
                    should_quit = true;
                }
            }
            tui.sync(&app);
            next = poll_event_immediate()?;
        }

        if should_quit {
            break;
        }

        // Background results (model lists, responder output)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            let effect = update(&mut app, action);
            if apply_effect(effect, &mut tui, &catalog, &tx, &mut responder_handle) {
                should_quit = true;
            }
        }

        if should_quit {
            break;
        }
    }

    if let Some(handle) = responder_handle.take() {
        handle.abort();
    }
    info!("Ronin shutting down");
    ratatui::restore();
    Ok(())
}

/// Send one terminal event to whoever owns it. Returns the resulting Action, if any.
fn route_event(event: &TuiEvent, app: &mut App, tui: &mut TuiState) -> Option<Action> {
    if matches!(event, TuiEvent::Resize) {
        return None;
    }
    if matches!(event, TuiEvent::ForceQuit) {
        return Some(Action::Quit);
    }

    if tui.control_bar.is_dropdown_open() {
        let control_event = tui.control_bar.handle_event(event)?;
        return control_action(control_event, tui);
    }

    match event {
        TuiEvent::ToggleFocus => {
            tui.toggle_focus();
            None
        }
        TuiEvent::ToggleChat => {
            tui.chat_visible = !tui.chat_visible;
            None
        }
        TuiEvent::RefreshModels => Some(Action::RefreshModels),
        TuiEvent::ActionButton
        | TuiEvent::Attach
        | TuiEvent::OpenModels
        | TuiEvent::MouseMove(..) => {
            let control_event = tui.control_bar.handle_event(event)?;
            control_action(control_event, tui)
        }
        TuiEvent::MouseClick(column, row) => {
            if let Some(control_event) = tui.control_bar.handle_event(event) {
                return control_action(control_event, tui);
            }
            focus_at(tui, Position::new(*column, *row));
            None
        }
        TuiEvent::ScrollUp | TuiEvent::ScrollDown => {
            tui.transcript.handle_event(event);
            None
        }
        TuiEvent::ScrollPageUp | TuiEvent::ScrollPageDown if tui.focus == Focus::Input => {
            tui.transcript.handle_event(event);
            None
        }
        _ => match tui.focus {
            Focus::Editor => {
                let CodeEvent::Trigger(key) = tui.code_view.handle_event(event)?;
                dispatch_shortcut(key, app, tui);
                None
            }
            Focus::Input => match tui.input.handle_event(event)? {
                InputEvent::SendMessage(text) => Some(Action::Submit(text)),
                InputEvent::ContentChanged => None,
            },
        },
    }
}

fn control_action(event: ControlEvent, tui: &TuiState) -> Option<Action> {
    match event {
        ControlEvent::ActionButtonClick => Some(Action::ActionButton),
        ControlEvent::AttachClick => Some(Action::Attach(
            tui.code_view.path().map(Path::to_path_buf),
        )),
        ControlEvent::ModelChange(name) => Some(Action::ModelSelected(name)),
    }
}

fn focus_at(tui: &mut TuiState, position: Position) {
    if tui.areas.input.contains(position) {
        tui.focus = Focus::Input;
    } else if tui.areas.editor.is_some_and(|area| area.contains(position))
        && tui.code_view.has_document()
    {
        tui.focus = Focus::Editor;
    }
}

/// Run the action bound to `key` against the code view's current selection.
fn dispatch_shortcut(key: char, app: &mut App, tui: &mut TuiState) {
    let Some(action) = tui.actions.iter().find(|a| a.shortcut() == Some(key)) else {
        debug!("No action bound to '{}'", key);
        return;
    };
    let snapshot = tui.code_view.snapshot();
    let ctx = ActionContext {
        project: Some(&app.project),
        editor: snapshot.as_ref(),
    };
    let mut surface = ChatSurface::new(&app.project, &mut tui.chat_visible, &mut app.conversation);
    let outcome = action.perform(&ctx, &mut surface);
    debug!("Action '{}' finished: {:?}", action.id(), outcome);
}

/// Carry out an Effect. Returns true when the loop should quit.
fn apply_effect(
    effect: Effect,
    tui: &mut TuiState,
    catalog: &Arc<dyn ModelCatalog>,
    tx: &mpsc::Sender<Action>,
    responder_handle: &mut Option<tokio::task::AbortHandle>,
) -> bool {
    match effect {
        Effect::None => {}
        Effect::Quit => return true,
        Effect::FetchModels => {
            tui.control_bar.set_models_loading(true);
            spawn_model_refresh(catalog.clone(), tx.clone());
        }
        Effect::ShowModels { models, selected } => {
            tui.control_bar.set_models_loading(false);
            tui.control_bar.update_models(models, selected.as_deref());
        }
        // Output the task sends after this point carries a stale run id
        Effect::AbortResponder => {
            if let Some(handle) = responder_handle.take() {
                handle.abort();
            }
        }
    }
    false
}

fn spawn_model_refresh(catalog: Arc<dyn ModelCatalog>, tx: mpsc::Sender<Action>) {
    info!("Refreshing models from {} catalog", catalog.name());
    tokio::spawn(async move {
        let action = match catalog.list_models().await {
            Ok(models) => {
                info!("Catalog returned {} models", models.len());
                Action::ModelsLoaded(models)
            }
            Err(e) => {
                warn!("Model refresh failed: {}", e);
                Action::ModelsFailed(e.to_string())
            }
        };
        if tx.send(action).is_err() {
            warn!("Failed to send model list: receiver dropped");
        }
    });
}

fn spawn_responder(request: ResponderRequest, tx: mpsc::Sender<Action>) -> tokio::task::AbortHandle {
    info!("Spawning responder task");
    tokio::spawn(responder::run(request, tx)).abort_handle()
}
