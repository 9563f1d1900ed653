//! # Actions
//!
//! Everything that can happen in Ronin becomes an `Action`.
//! User presses Enter? That's `Action::Submit(text)`.
//! The responder prints a line? That's `Action::ResponseChunk { run, text }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state, and returns an `Effect` describing the I/O the adapter must
//! perform. No side effects here. I/O happens elsewhere.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use std::path::PathBuf;

use log::{debug, info};

use crate::core::state::App;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Text submitted from the input field.
    Submit(String),
    /// The control bar's reset/stop button. Meaning depends on generation state.
    ActionButton,
    /// Attach button. `None` when there is nothing to attach.
    Attach(Option<PathBuf>),
    /// The user picked a model in the dropdown.
    ModelSelected(String),
    RefreshModels,
    ModelsLoaded(Vec<String>),
    ModelsFailed(String),
    /// Responder output. `run` is the id of the request that produced it.
    ResponseChunk { run: u64, text: String },
    ResponseDone { run: u64 },
    ResponseFailed { run: u64, message: String },
    Quit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    /// Put the model selector into its loading state and start a catalog fetch.
    FetchModels,
    /// Replace the model selector contents, keeping `selected` if present.
    ShowModels {
        models: Vec<String>,
        selected: Option<String>,
    },
    /// Kill the running responder.
    AbortResponder,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::Submit(text) => {
            app.conversation.send_message(text);
            Effect::None
        }
        Action::ActionButton => {
            if app.conversation.is_generating() {
                app.conversation.stop();
                app.current_run = None;
                app.status_message = "Generation stopped".to_string();
                Effect::AbortResponder
            } else {
                app.conversation.reset();
                app.current_run = None;
                app.status_message = "Chat reset".to_string();
                Effect::None
            }
        }
        Action::Attach(Some(path)) => {
            let name = path.display().to_string();
            app.status_message = if app.conversation.attach(path) {
                format!("Attached {name}")
            } else {
                format!("{name} is already attached")
            };
            Effect::None
        }
        Action::Attach(None) => {
            app.status_message = "Nothing to attach: open a file first".to_string();
            Effect::None
        }
        Action::ModelSelected(name) => {
            info!("Model selected: {}", name);
            app.status_message = format!("Model: {name}");
            app.model_name = Some(name);
            Effect::None
        }
        Action::RefreshModels => {
            if app.models_loading {
                return Effect::None;
            }
            app.models_loading = true;
            app.status_message = "Loading models...".to_string();
            Effect::FetchModels
        }
        Action::ModelsLoaded(models) => {
            app.models_loading = false;
            // Keep the current choice if the catalog still offers it
            let selected = app
                .model_name
                .clone()
                .filter(|name| models.contains(name))
                .or_else(|| models.first().cloned());
            app.status_message = format!("{} models available", models.len());
            if selected.is_some() {
                app.model_name = selected.clone();
            }
            Effect::ShowModels { models, selected }
        }
        Action::ModelsFailed(message) => {
            app.models_loading = false;
            app.status_message = format!("Model list failed: {message}");
            Effect::ShowModels {
                models: Vec::new(),
                selected: None,
            }
        }
        Action::ResponseChunk { run, .. }
        | Action::ResponseDone { run }
        | Action::ResponseFailed { run, .. }
            if app.current_run != Some(run) =>
        {
            debug!("Ignoring output from stale responder run {}", run);
            Effect::None
        }
        Action::ResponseChunk { text, .. } => {
            app.conversation.append_response(&text);
            Effect::None
        }
        Action::ResponseDone { .. } => {
            app.current_run = None;
            app.conversation.finish_generation();
            app.status_message.clear();
            Effect::None
        }
        Action::ResponseFailed { message, .. } => {
            app.current_run = None;
            app.conversation.finish_generation();
            app.conversation.push_notice(format!("Responder error: {message}"));
            app.status_message = "Responder failed".to_string();
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::conversation::Role;
    use crate::test_support::test_app;

    #[test]
    fn test_submit_queues_message() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::Submit("hi".to_string())), Effect::None);
        assert_eq!(app.conversation.pending_len(), 1);
    }

    #[test]
    fn test_action_button_resets_when_idle() {
        let mut app = test_app();
        app.conversation.push_notice("old");
        assert_eq!(update(&mut app, Action::ActionButton), Effect::None);
        assert!(app.conversation.entries().is_empty());
        assert_eq!(app.status_message, "Chat reset");
    }

    #[test]
    fn test_action_button_stops_when_generating() {
        let mut app = test_app();
        update(&mut app, Action::Submit("hi".to_string()));
        app.conversation.next_request();

        assert_eq!(update(&mut app, Action::ActionButton), Effect::AbortResponder);
        assert!(!app.conversation.is_generating());
        // Stop keeps the transcript
        assert_eq!(app.conversation.entries()[0].role, Role::User);
    }

    #[test]
    fn test_reset_keeps_model() {
        let mut app = test_app();
        app.model_name = Some("m".to_string());
        update(&mut app, Action::ActionButton);
        assert_eq!(app.model_name.as_deref(), Some("m"));
    }

    #[test]
    fn test_refresh_is_not_doubled_while_loading() {
        let mut app = test_app();
        assert_eq!(update(&mut app, Action::RefreshModels), Effect::FetchModels);
        assert_eq!(update(&mut app, Action::RefreshModels), Effect::None);
    }

    #[test]
    fn test_models_loaded_keeps_current_choice() {
        let mut app = test_app();
        app.model_name = Some("b".to_string());
        let effect = update(
            &mut app,
            Action::ModelsLoaded(vec!["a".to_string(), "b".to_string()]),
        );
        assert_eq!(
            effect,
            Effect::ShowModels {
                models: vec!["a".to_string(), "b".to_string()],
                selected: Some("b".to_string()),
            }
        );
        assert!(!app.models_loading);
    }

    #[test]
    fn test_models_loaded_falls_back_to_first() {
        let mut app = test_app();
        app.model_name = Some("gone".to_string());
        update(&mut app, Action::ModelsLoaded(vec!["a".to_string()]));
        assert_eq!(app.model_name.as_deref(), Some("a"));
    }

    #[test]
    fn test_models_failed_shows_empty_list() {
        let mut app = test_app();
        app.models_loading = true;
        let effect = update(&mut app, Action::ModelsFailed("offline".to_string()));
        assert_eq!(
            effect,
            Effect::ShowModels {
                models: Vec::new(),
                selected: None,
            }
        );
        assert!(app.status_message.contains("offline"));
    }

    /// Queue `prompt` and start it the way the event loop does.
    fn start_run(app: &mut App, prompt: &str) -> u64 {
        app.responder_command = Some("cat".to_string());
        update(app, Action::Submit(prompt.to_string()));
        app.take_responder_request().unwrap().run
    }

    #[test]
    fn test_response_failed_adds_notice() {
        let mut app = test_app();
        let run = start_run(&mut app, "hi");
        update(
            &mut app,
            Action::ResponseFailed {
                run,
                message: "exit 1".to_string(),
            },
        );

        let last = app.conversation.entries().last().unwrap();
        assert_eq!(last.role, Role::Notice);
        assert!(last.content.contains("exit 1"));
        assert!(!app.conversation.is_generating());
    }

    #[test]
    fn test_output_from_stopped_run_is_ignored() {
        let mut app = test_app();
        let first = start_run(&mut app, "one");
        assert_eq!(update(&mut app, Action::ActionButton), Effect::AbortResponder);

        let second = start_run(&mut app, "two");
        assert_ne!(first, second);

        update(
            &mut app,
            Action::ResponseChunk {
                run: first,
                text: "late".to_string(),
            },
        );
        update(&mut app, Action::ResponseDone { run: first });
        assert!(app.conversation.is_generating());
        assert!(app.conversation.entries().iter().all(|e| e.role != Role::Assistant));

        update(
            &mut app,
            Action::ResponseChunk {
                run: second,
                text: "fresh".to_string(),
            },
        );
        update(&mut app, Action::ResponseDone { run: second });
        assert!(!app.conversation.is_generating());
        assert_eq!(app.conversation.entries().last().unwrap().content, "fresh");
    }

    #[test]
    fn test_stale_failure_does_not_end_current_run() {
        let mut app = test_app();
        let first = start_run(&mut app, "one");
        update(&mut app, Action::ActionButton);
        start_run(&mut app, "two");

        update(
            &mut app,
            Action::ResponseFailed {
                run: first,
                message: "killed".to_string(),
            },
        );
        assert!(app.conversation.is_generating());
        assert!(app.conversation.entries().iter().all(|e| !e.content.contains("killed")));
    }

    #[test]
    fn test_attach_without_file() {
        let mut app = test_app();
        update(&mut app, Action::Attach(None));
        assert!(app.conversation.attachments().is_empty());
        assert!(app.status_message.starts_with("Nothing to attach"));
    }
}
