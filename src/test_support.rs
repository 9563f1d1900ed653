//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::core::conversation::Conversation;
use crate::core::state::App;
use crate::core::surface::{
    CONVERSATION_SURFACE_ID, ConversationController, ConversationSurfaceLocator, Project,
};

pub fn test_project() -> Project {
    Project::from_root("/tmp/ronin-test")
}

/// Creates a test App with no responder command.
pub fn test_app() -> App {
    App::new(test_project(), None)
}

/// Locator that knows one project and records what reaches its controller.
pub struct RecordingLocator {
    project: Project,
    controller: Option<Conversation>,
    pub shown: bool,
}

impl RecordingLocator {
    pub fn with_controller(project: Project) -> Self {
        Self {
            project,
            controller: Some(Conversation::new()),
            shown: false,
        }
    }

    pub fn without_controller(project: Project) -> Self {
        Self {
            project,
            controller: None,
            shown: false,
        }
    }

    /// Contents of every message delivered so far.
    pub fn delivered(&self) -> Vec<String> {
        self.controller
            .as_ref()
            .map(|c| c.entries().iter().map(|e| e.content.clone()).collect())
            .unwrap_or_default()
    }
}

impl ConversationSurfaceLocator for RecordingLocator {
    fn show_surface(&mut self, project: &Project, id: &str) -> bool {
        if *project != self.project || id != CONVERSATION_SURFACE_ID {
            return false;
        }
        self.shown = true;
        true
    }

    fn controller(&mut self, project: &Project) -> Option<&mut dyn ConversationController> {
        if *project != self.project {
            return None;
        }
        self.controller
            .as_mut()
            .map(|c| c as &mut dyn ConversationController)
    }
}
