//! # Conversation Surface
//!
//! Seams between prompt producers and the chat panel that consumes prompts.
//!
//! The chat panel is looked up through a `ConversationSurfaceLocator`, so
//! producers never hold a reference to it. A locator may find nothing, and
//! that is a normal state: callers drop the prompt quietly.
//!
//! Everything here is driven from the UI event loop. None of these types are
//! meant to be shared across threads.

use std::path::{Path, PathBuf};

/// Fixed identifier the chat panel is registered under.
pub const CONVERSATION_SURFACE_ID: &str = "Ronin Chat";

/// The workspace a session is operating on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Project {
    pub name: String,
    pub root: PathBuf,
}

impl Project {
    /// Build a project from its root directory, named after the last path component.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let name = root
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| root.display().to_string());
        Self { name, root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

/// Receives prompts and owns everything that happens after: transcript,
/// backend call, response streaming.
pub trait ConversationController {
    fn send_message_programmatically(&mut self, prompt: String);
}

/// Resolves the chat panel and its controller for a project.
pub trait ConversationSurfaceLocator {
    /// Reveal the surface registered under `id`. Idempotent if already visible.
    ///
    /// Returns `false` when no surface with that id exists for `project`.
    fn show_surface(&mut self, project: &Project, id: &str) -> bool;

    /// The controller behind the surface, if it has been initialized.
    fn controller(&mut self, project: &Project) -> Option<&mut dyn ConversationController>;
}
