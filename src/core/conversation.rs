//! # Conversation
//!
//! The chat panel's controller: transcript, queued prompts, attachments and
//! the generation flag.
//!
//! Prompts from the input field and from editor actions land here the same
//! way. They are queued, and the event loop pulls them one at a time with
//! `next_request()` while no generation is running.

use std::collections::VecDeque;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use log::{debug, info};

use crate::core::surface::ConversationController;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
    /// Local status line (stopped, reset, missing responder). Never sent anywhere.
    Notice,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub role: Role,
    pub content: String,
    pub at: DateTime<Local>,
}

impl Entry {
    fn new(role: Role, content: String) -> Self {
        Self {
            role,
            content,
            at: Local::now(),
        }
    }
}

#[derive(Debug, Default)]
pub struct Conversation {
    entries: Vec<Entry>,
    pending: VecDeque<String>,
    attachments: Vec<PathBuf>,
    generating: bool,
    /// Set once the current generation has produced its first chunk.
    replying: bool,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn attachments(&self) -> &[PathBuf] {
        &self.attachments
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    /// Append a user message and queue it for the responder.
    ///
    /// Queued attachments are referenced at the end of the message and then cleared.
    pub fn send_message(&mut self, text: String) {
        let message = if self.attachments.is_empty() {
            text
        } else {
            let refs: Vec<String> = self
                .attachments
                .drain(..)
                .map(|p| format!("Attached: {}", p.display()))
                .collect();
            format!("{text}\n\n{}", refs.join("\n"))
        };
        debug!("Queued message ({} bytes)", message.len());
        self.entries.push(Entry::new(Role::User, message.clone()));
        self.pending.push_back(message);
    }

    /// Queue a file to be referenced by the next message. Duplicates are ignored.
    pub fn attach(&mut self, path: PathBuf) -> bool {
        if self.attachments.contains(&path) {
            return false;
        }
        self.attachments.push(path);
        true
    }

    pub fn push_notice(&mut self, text: impl Into<String>) {
        self.entries.push(Entry::new(Role::Notice, text.into()));
    }

    /// Take the next queued prompt and mark generation as started.
    ///
    /// Returns `None` while a generation is running or when nothing is queued.
    pub fn next_request(&mut self) -> Option<String> {
        if self.generating {
            return None;
        }
        let prompt = self.pending.pop_front()?;
        self.generating = true;
        self.replying = false;
        Some(prompt)
    }

    /// Append streamed response text to the current assistant entry.
    pub fn append_response(&mut self, chunk: &str) {
        if !self.generating {
            debug!("Dropping response chunk outside of a generation");
            return;
        }
        if self.replying
            && let Some(last) = self.entries.last_mut()
            && last.role == Role::Assistant
        {
            last.content.push_str(chunk);
            return;
        }
        self.replying = true;
        self.entries
            .push(Entry::new(Role::Assistant, chunk.to_string()));
    }

    /// Mark the current generation as finished.
    pub fn finish_generation(&mut self) {
        if let Some(last) = self.entries.last_mut()
            && self.replying
            && last.role == Role::Assistant
        {
            let trimmed = last.content.trim_end().len();
            last.content.truncate(trimmed);
        }
        self.generating = false;
        self.replying = false;
    }

    /// Stop the running generation and drop anything still queued.
    pub fn stop(&mut self) {
        if !self.generating {
            return;
        }
        self.finish_generation();
        self.pending.clear();
        self.push_notice("Generation stopped.");
        info!("Generation stopped");
    }

    /// Clear the transcript, queue and attachments.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.pending.clear();
        self.attachments.clear();
        self.generating = false;
        self.replying = false;
        info!("Conversation reset");
    }
}

impl ConversationController for Conversation {
    fn send_message_programmatically(&mut self, prompt: String) {
        self.send_message(prompt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_message_appends_and_queues() {
        let mut convo = Conversation::new();
        convo.send_message("hello".to_string());

        assert_eq!(convo.entries().len(), 1);
        assert_eq!(convo.entries()[0].role, Role::User);
        assert_eq!(convo.pending_len(), 1);
    }

    #[test]
    fn test_next_request_waits_for_generation() {
        let mut convo = Conversation::new();
        convo.send_message("one".to_string());
        convo.send_message("two".to_string());

        assert_eq!(convo.next_request().as_deref(), Some("one"));
        assert!(convo.is_generating());
        assert_eq!(convo.next_request(), None);

        convo.finish_generation();
        assert_eq!(convo.next_request().as_deref(), Some("two"));
    }

    #[test]
    fn test_streamed_chunks_join_one_entry() {
        let mut convo = Conversation::new();
        convo.send_message("hi".to_string());
        convo.next_request();

        convo.append_response("Hel");
        convo.append_response("lo\n");
        convo.finish_generation();

        let last = convo.entries().last().unwrap();
        assert_eq!(last.role, Role::Assistant);
        assert_eq!(last.content, "Hello");
        assert_eq!(convo.entries().len(), 2);
    }

    #[test]
    fn test_chunks_outside_generation_are_dropped() {
        let mut convo = Conversation::new();
        convo.append_response("stray");
        assert!(convo.entries().is_empty());
    }

    #[test]
    fn test_attachments_are_referenced_once() {
        let mut convo = Conversation::new();
        assert!(convo.attach(PathBuf::from("src/lib.rs")));
        assert!(!convo.attach(PathBuf::from("src/lib.rs")));

        convo.send_message("look".to_string());
        assert_eq!(convo.entries()[0].content, "look\n\nAttached: src/lib.rs");
        assert!(convo.attachments().is_empty());

        convo.send_message("again".to_string());
        assert_eq!(convo.entries()[1].content, "again");
    }

    #[test]
    fn test_stop_clears_queue_and_notes_it() {
        let mut convo = Conversation::new();
        convo.send_message("one".to_string());
        convo.send_message("two".to_string());
        convo.next_request();

        convo.stop();
        assert!(!convo.is_generating());
        assert_eq!(convo.pending_len(), 0);
        assert_eq!(convo.entries().last().unwrap().role, Role::Notice);
    }

    #[test]
    fn test_stop_when_idle_is_noop() {
        let mut convo = Conversation::new();
        convo.stop();
        assert!(convo.entries().is_empty());
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut convo = Conversation::new();
        convo.attach(PathBuf::from("a.rs"));
        convo.send_message("one".to_string());
        convo.next_request();

        convo.reset();
        assert!(convo.entries().is_empty());
        assert!(convo.attachments().is_empty());
        assert!(!convo.is_generating());
        assert_eq!(convo.next_request(), None);
    }

    #[test]
    fn test_controller_queues_like_input() {
        let mut convo = Conversation::new();
        let controller: &mut dyn ConversationController = &mut convo;
        controller.send_message_programmatically("Explain this".to_string());
        assert_eq!(convo.next_request().as_deref(), Some("Explain this"));
    }
}
