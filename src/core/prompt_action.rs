//! # Prompt Actions
//!
//! Editor actions that turn the current selection into a chat prompt.
//!
//! An action implements `get_prompt` and inherits the rest from the trait's
//! provided methods:
//!
//! ```text
//! update()  : editor present + non-empty selection  →  enabled_and_visible
//! perform() : project? editor? selection?  →  get_prompt(selection)
//!             →  show surface "Ronin Chat"  →  controller?  →  deliver
//! ```
//!
//! Every missing precondition ends the invocation without touching the
//! conversation. Actions keep no state between invocations.

use log::{debug, info};

use crate::core::surface::{CONVERSATION_SURFACE_ID, ConversationSurfaceLocator, Project};

/// What the focused editor looks like at invocation time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditorSnapshot {
    /// Display name of the open document.
    pub document: String,
    /// Exact text of the current selection, if any.
    pub selected_text: Option<String>,
}

impl EditorSnapshot {
    pub fn has_selection(&self) -> bool {
        self.selected_text.as_deref().is_some_and(|s| !s.is_empty())
    }
}

/// Everything an action can see when it is updated or invoked.
#[derive(Debug, Clone, Copy, Default)]
pub struct ActionContext<'a> {
    pub project: Option<&'a Project>,
    /// The focused editor. `None` when focus is elsewhere.
    pub editor: Option<&'a EditorSnapshot>,
}

/// How an action should be presented on the current refresh tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Presentation {
    pub enabled_and_visible: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    NoProject,
    NoEditor,
    NoSelection,
    SurfaceMissing,
    ControllerMissing,
}

/// Result of a single invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dispatch {
    Delivered,
    Skipped(SkipReason),
}

pub trait PromptAction {
    /// Stable identifier, used in logs.
    fn id(&self) -> &'static str;

    /// Short label shown next to the shortcut.
    fn label(&self) -> &'static str;

    /// Key that triggers the action while the editor is focused.
    fn shortcut(&self) -> Option<char> {
        None
    }

    /// Build the prompt for `code`, the exact selected text. Must be pure.
    fn get_prompt(&self, code: &str) -> String;

    fn update(&self, ctx: &ActionContext<'_>) -> Presentation {
        Presentation {
            enabled_and_visible: ctx.editor.is_some_and(EditorSnapshot::has_selection),
        }
    }

    fn perform(
        &self,
        ctx: &ActionContext<'_>,
        locator: &mut dyn ConversationSurfaceLocator,
    ) -> Dispatch {
        let Some(project) = ctx.project else {
            return skipped(self.id(), SkipReason::NoProject);
        };
        let Some(editor) = ctx.editor else {
            return skipped(self.id(), SkipReason::NoEditor);
        };
        let Some(selected) = editor.selected_text.as_deref().filter(|s| !s.is_empty()) else {
            return skipped(self.id(), SkipReason::NoSelection);
        };

        let prompt = self.get_prompt(selected);

        if !locator.show_surface(project, CONVERSATION_SURFACE_ID) {
            return skipped(self.id(), SkipReason::SurfaceMissing);
        }
        let Some(controller) = locator.controller(project) else {
            return skipped(self.id(), SkipReason::ControllerMissing);
        };

        info!(
            "Action '{}' delivering prompt from {} ({} bytes selected)",
            self.id(),
            editor.document,
            selected.len()
        );
        controller.send_message_programmatically(prompt);
        Dispatch::Delivered
    }
}

fn skipped(id: &str, reason: SkipReason) -> Dispatch {
    debug!("Action '{}' skipped: {:?}", id, reason);
    Dispatch::Skipped(reason)
}

/// Wrap code in a fenced block, widening the fence if the code contains one.
fn fenced(code: &str) -> String {
    let mut fence = String::from("```");
    while code.contains(fence.as_str()) {
        fence.push('`');
    }
    format!("{fence}\n{code}\n{fence}")
}

// ============================================================================
// Built-in actions
// ============================================================================

pub struct ExplainCode;

impl PromptAction for ExplainCode {
    fn id(&self) -> &'static str {
        "explain"
    }

    fn label(&self) -> &'static str {
        "Explain"
    }

    fn shortcut(&self) -> Option<char> {
        Some('e')
    }

    fn get_prompt(&self, code: &str) -> String {
        format!(
            "Explain what the following code does, step by step:\n\n{}",
            fenced(code)
        )
    }
}

pub struct RefactorCode;

impl PromptAction for RefactorCode {
    fn id(&self) -> &'static str {
        "refactor"
    }

    fn label(&self) -> &'static str {
        "Refactor"
    }

    fn shortcut(&self) -> Option<char> {
        Some('r')
    }

    fn get_prompt(&self, code: &str) -> String {
        format!(
            "Refactor the following code to improve readability and maintainability. \
             Keep the behavior identical and explain each change:\n\n{}",
            fenced(code)
        )
    }
}

pub struct WriteTests;

impl PromptAction for WriteTests {
    fn id(&self) -> &'static str {
        "write-tests"
    }

    fn label(&self) -> &'static str {
        "Tests"
    }

    fn shortcut(&self) -> Option<char> {
        Some('t')
    }

    fn get_prompt(&self, code: &str) -> String {
        format!(
            "Write unit tests for the following code. Cover normal cases and edge cases:\n\n{}",
            fenced(code)
        )
    }
}

pub struct FindBugs;

impl PromptAction for FindBugs {
    fn id(&self) -> &'static str {
        "find-bugs"
    }

    fn label(&self) -> &'static str {
        "Bugs"
    }

    fn shortcut(&self) -> Option<char> {
        Some('b')
    }

    fn get_prompt(&self, code: &str) -> String {
        format!(
            "Review the following code for bugs, unhandled edge cases and error handling \
             problems. List each issue with a suggested fix:\n\n{}",
            fenced(code)
        )
    }
}

pub struct DocumentCode;

impl PromptAction for DocumentCode {
    fn id(&self) -> &'static str {
        "document"
    }

    fn label(&self) -> &'static str {
        "Document"
    }

    fn shortcut(&self) -> Option<char> {
        Some('d')
    }

    fn get_prompt(&self, code: &str) -> String {
        format!(
            "Add documentation comments to the following code. Return the full code:\n\n{}",
            fenced(code)
        )
    }
}

/// All built-in actions, in the order they are listed in the editor footer.
pub fn builtin_actions() -> Vec<Box<dyn PromptAction>> {
    vec![
        Box::new(ExplainCode),
        Box::new(RefactorCode),
        Box::new(WriteTests),
        Box::new(FindBugs),
        Box::new(DocumentCode),
    ]
}
