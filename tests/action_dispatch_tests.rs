use std::cell::RefCell;

use ronin::core::prompt_action::{
    ActionContext, Dispatch, EditorSnapshot, PromptAction, SkipReason, builtin_actions,
};
use ronin::core::surface::{
    CONVERSATION_SURFACE_ID, ConversationController, ConversationSurfaceLocator, Project,
};

// ============================================================================
// Fakes
// ============================================================================

#[derive(Default)]
struct FakeController {
    received: Vec<String>,
}

impl ConversationController for FakeController {
    fn send_message_programmatically(&mut self, prompt: String) {
        self.received.push(prompt);
    }
}

/// Locator whose surface and controller can each be present or missing.
struct FakeLocator {
    surface_registered: bool,
    controller: Option<FakeController>,
    show_calls: Vec<String>,
}

impl FakeLocator {
    fn ready() -> Self {
        Self {
            surface_registered: true,
            controller: Some(FakeController::default()),
            show_calls: Vec::new(),
        }
    }

    fn received(&self) -> &[String] {
        self.controller
            .as_ref()
            .map(|c| c.received.as_slice())
            .unwrap_or_default()
    }
}

impl ConversationSurfaceLocator for FakeLocator {
    fn show_surface(&mut self, _project: &Project, id: &str) -> bool {
        self.show_calls.push(id.to_string());
        self.surface_registered
    }

    fn controller(&mut self, _project: &Project) -> Option<&mut dyn ConversationController> {
        self.controller
            .as_mut()
            .map(|c| c as &mut dyn ConversationController)
    }
}

/// Action that records every string handed to `get_prompt`.
#[derive(Default)]
struct RecordingAction {
    seen: RefCell<Vec<String>>,
}

impl PromptAction for RecordingAction {
    fn id(&self) -> &'static str {
        "recording"
    }

    fn label(&self) -> &'static str {
        "Record"
    }

    fn get_prompt(&self, code: &str) -> String {
        self.seen.borrow_mut().push(code.to_string());
        format!("PROMPT<{code}>")
    }
}

fn project() -> Project {
    Project::from_root("/tmp/ronin-dispatch")
}

fn editor(selected: Option<&str>) -> EditorSnapshot {
    EditorSnapshot {
        document: "main.rs".to_string(),
        selected_text: selected.map(str::to_string),
    }
}

// ============================================================================
// Presentation
// ============================================================================

#[test]
fn test_no_selection_disables_every_builtin() {
    let project = project();
    let snapshot = editor(None);
    let ctx = ActionContext {
        project: Some(&project),
        editor: Some(&snapshot),
    };
    for action in builtin_actions() {
        assert!(!action.update(&ctx).enabled_and_visible, "{}", action.id());
    }
}

#[test]
fn test_empty_selection_counts_as_none() {
    let project = project();
    let snapshot = editor(Some(""));
    let ctx = ActionContext {
        project: Some(&project),
        editor: Some(&snapshot),
    };
    assert!(!RecordingAction::default().update(&ctx).enabled_and_visible);
}

#[test]
fn test_no_focused_editor_disables() {
    let project = project();
    let ctx = ActionContext {
        project: Some(&project),
        editor: None,
    };
    assert!(!RecordingAction::default().update(&ctx).enabled_and_visible);
}

#[test]
fn test_selection_enables_and_prompt_gets_exact_text() {
    let project = project();
    let snapshot = editor(Some("foo"));
    let ctx = ActionContext {
        project: Some(&project),
        editor: Some(&snapshot),
    };
    let action = RecordingAction::default();
    let mut locator = FakeLocator::ready();

    assert!(action.update(&ctx).enabled_and_visible);
    assert_eq!(action.perform(&ctx, &mut locator), Dispatch::Delivered);

    assert_eq!(*action.seen.borrow(), vec!["foo".to_string()]);
    assert_eq!(locator.received(), ["PROMPT<foo>".to_string()]);
    assert_eq!(locator.show_calls, vec![CONVERSATION_SURFACE_ID.to_string()]);
}

#[test]
fn test_selection_whitespace_is_passed_through() {
    let project = project();
    let snapshot = editor(Some("  indented()\n"));
    let ctx = ActionContext {
        project: Some(&project),
        editor: Some(&snapshot),
    };
    let action = RecordingAction::default();
    action.perform(&ctx, &mut FakeLocator::ready());

    assert_eq!(*action.seen.borrow(), vec!["  indented()\n".to_string()]);
}

// ============================================================================
// Missing preconditions
// ============================================================================

#[test]
fn test_unresolved_controller_is_silent() {
    let project = project();
    let snapshot = editor(Some("foo"));
    let ctx = ActionContext {
        project: Some(&project),
        editor: Some(&snapshot),
    };
    let mut locator = FakeLocator {
        controller: None,
        ..FakeLocator::ready()
    };

    assert_eq!(
        RecordingAction::default().perform(&ctx, &mut locator),
        Dispatch::Skipped(SkipReason::ControllerMissing)
    );
    assert!(locator.received().is_empty());
}

#[test]
fn test_missing_surface_never_reaches_controller() {
    let project = project();
    let snapshot = editor(Some("foo"));
    let ctx = ActionContext {
        project: Some(&project),
        editor: Some(&snapshot),
    };
    let mut locator = FakeLocator {
        surface_registered: false,
        ..FakeLocator::ready()
    };

    assert_eq!(
        RecordingAction::default().perform(&ctx, &mut locator),
        Dispatch::Skipped(SkipReason::SurfaceMissing)
    );
    assert!(locator.received().is_empty());
}

#[test]
fn test_no_project_touches_nothing() {
    let snapshot = editor(Some("foo"));
    let ctx = ActionContext {
        project: None,
        editor: Some(&snapshot),
    };
    let action = RecordingAction::default();
    let mut locator = FakeLocator::ready();

    assert_eq!(
        action.perform(&ctx, &mut locator),
        Dispatch::Skipped(SkipReason::NoProject)
    );
    assert!(locator.show_calls.is_empty());
    assert!(action.seen.borrow().is_empty());
}

#[test]
fn test_trigger_without_selection_is_skipped() {
    let project = project();
    let snapshot = editor(None);
    let ctx = ActionContext {
        project: Some(&project),
        editor: Some(&snapshot),
    };
    let mut locator = FakeLocator::ready();

    assert_eq!(
        RecordingAction::default().perform(&ctx, &mut locator),
        Dispatch::Skipped(SkipReason::NoSelection)
    );
    assert!(locator.show_calls.is_empty());
}

// ============================================================================
// Built-in prompts
// ============================================================================

#[test]
fn test_builtin_prompts_embed_selection_verbatim() {
    let code = "fn add(a: i32, b: i32) -> i32 { a + b }";
    for action in builtin_actions() {
        let prompt = action.get_prompt(code);
        assert!(prompt.contains(code), "{} lost the code", action.id());
        assert_eq!(prompt, action.get_prompt(code), "{} is not pure", action.id());
    }
}
