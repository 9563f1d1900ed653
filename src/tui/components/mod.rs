//! # TUI Components
//!
//! Every piece of the screen, one file (or directory) per component.
//!
//! ## Component Architecture
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: application, project, model and status line
//! - `Transcript`: transient wrapper created each frame over `TranscriptState`
//!
//! ### Stateful Components (Event-Driven)
//!
//! Components that own local state and emit events for the event loop to route:
//! - `InputField`: multi-line message input, emits `InputEvent`
//! - `ControlBar`: model selector and chat buttons, emits `ControlEvent`
//! - `CodeView`: the open file with a line selection, emits `CodeEvent`
//!
//! Components never reach into `App`. External data comes in as props set
//! by the event loop, and intent goes out as event values.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (top status line)
//! ├── transcript.rs    (scrollable conversation)
//! ├── control_bar.rs   (model selector, reset/stop, attach)
//! ├── code_view.rs     (editor pane)
//! └── input_field/     (text input with wrap-aware cursor)
//! ```

pub mod code_view;
pub mod control_bar;
pub mod input_field;
mod title_bar;
pub mod transcript;

pub use code_view::{ActionHint, CodeEvent, CodeView};
pub use control_bar::{ControlBar, ControlEvent};
pub use input_field::{InputEvent, InputField};
pub use title_bar::TitleBar;
pub use transcript::{Transcript, TranscriptState};
