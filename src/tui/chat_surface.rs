//! The chat panel as seen by prompt actions.
//!
//! `ChatSurface` is built for the duration of one dispatch from borrows of
//! the panel's visibility flag and the conversation, so actions can reveal
//! the panel and hand it a prompt without holding on to either.

use log::info;

use crate::core::conversation::Conversation;
use crate::core::surface::{
    CONVERSATION_SURFACE_ID, ConversationController, ConversationSurfaceLocator, Project,
};

pub struct ChatSurface<'a> {
    project: &'a Project,
    visible: &'a mut bool,
    conversation: &'a mut Conversation,
}

impl<'a> ChatSurface<'a> {
    pub fn new(project: &'a Project, visible: &'a mut bool, conversation: &'a mut Conversation) -> Self {
        Self {
            project,
            visible,
            conversation,
        }
    }
}

impl ConversationSurfaceLocator for ChatSurface<'_> {
    fn show_surface(&mut self, project: &Project, id: &str) -> bool {
        if project != self.project || id != CONVERSATION_SURFACE_ID {
            return false;
        }
        if !*self.visible {
            info!("Revealing {} panel", CONVERSATION_SURFACE_ID);
            *self.visible = true;
        }
        true
    }

    fn controller(&mut self, project: &Project) -> Option<&mut dyn ConversationController> {
        if project != self.project {
            return None;
        }
        Some(&mut *self.conversation as &mut dyn ConversationController)
    }
}
