//! # Application State
//!
//! Core business state for Ronin. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── project: Project                  // workspace the session runs in
//! ├── conversation: Conversation        // transcript + generation flag
//! ├── model_name: Option<String>        // model passed to the responder
//! ├── models_loading: bool              // catalog fetch in flight
//! ├── responder_command: Option<String> // external reply command
//! ├── current_run: Option<u64>          // responder run whose output is accepted
//! └── status_message: String            // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs,
//! plus `take_responder_request()` which the event loop calls between frames.

use crate::core::config::ResolvedConfig;
use crate::core::conversation::Conversation;
use crate::core::responder::ResponderRequest;
use crate::core::surface::Project;

pub struct App {
    pub project: Project,
    pub conversation: Conversation,
    pub model_name: Option<String>,
    pub models_loading: bool,
    pub responder_command: Option<String>,
    /// Id of the responder run whose output `update` accepts.
    pub current_run: Option<u64>,
    next_run: u64,
    pub status_message: String,
}

impl App {
    pub fn new(project: Project, model_name: Option<String>) -> Self {
        Self {
            project,
            conversation: Conversation::new(),
            model_name,
            models_loading: false,
            responder_command: None,
            current_run: None,
            next_run: 1,
            status_message: String::from("Welcome to Ronin!"),
        }
    }

    pub fn from_config(config: &ResolvedConfig) -> Self {
        let mut app = Self::new(
            Project::from_root(config.project_root.clone()),
            config.model_name.clone(),
        );
        app.responder_command = config.responder_command.clone();
        app
    }

    /// Pull the next queued prompt into a responder request.
    ///
    /// Without a configured command the prompt is answered with a notice and
    /// the generation ends immediately.
    pub fn take_responder_request(&mut self) -> Option<ResponderRequest> {
        let prompt = self.conversation.next_request()?;
        let Some(command) = self.responder_command.clone() else {
            self.conversation.push_notice(
                "No responder configured. Set [responder] command in ~/.ronin/config.toml \
                 or the RONIN_RESPONDER environment variable.",
            );
            self.conversation.finish_generation();
            return None;
        };
        let run = self.next_run;
        self.next_run += 1;
        self.current_run = Some(run);
        Some(ResponderRequest {
            run,
            command,
            prompt,
            model: self.model_name.clone(),
            working_dir: self.project.root.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::core::conversation::Role;
    use crate::test_support::test_app;

    #[test]
    fn test_app_new_defaults() {
        let app = test_app();
        assert_eq!(app.status_message, "Welcome to Ronin!");
        assert!(!app.conversation.is_generating());
        assert!(!app.models_loading);
    }

    #[test]
    fn test_request_carries_model_and_root() {
        let mut app = test_app();
        app.responder_command = Some("cat".to_string());
        app.model_name = Some("m".to_string());
        app.conversation.send_message("hi".to_string());

        let request = app.take_responder_request().unwrap();
        assert_eq!(request.prompt, "hi");
        assert_eq!(request.model.as_deref(), Some("m"));
        assert_eq!(request.working_dir, app.project.root);
        assert!(app.conversation.is_generating());
        assert_eq!(app.current_run, Some(request.run));
    }

    #[test]
    fn test_each_request_gets_a_new_run() {
        let mut app = test_app();
        app.responder_command = Some("cat".to_string());
        app.conversation.send_message("one".to_string());
        app.conversation.send_message("two".to_string());

        let first = app.take_responder_request().unwrap();
        app.conversation.finish_generation();
        let second = app.take_responder_request().unwrap();
        assert_ne!(first.run, second.run);
        assert_eq!(app.current_run, Some(second.run));
    }

    #[test]
    fn test_missing_responder_answers_with_notice() {
        let mut app = test_app();
        app.conversation.send_message("hi".to_string());

        assert!(app.take_responder_request().is_none());
        assert!(!app.conversation.is_generating());
        assert_eq!(app.current_run, None);
        assert_eq!(app.conversation.entries().last().unwrap().role, Role::Notice);
    }

    #[test]
    fn test_nothing_queued() {
        let mut app = test_app();
        app.responder_command = Some("cat".to_string());
        assert!(app.take_responder_request().is_none());
    }
}
