//! # Core Application Logic
//!
//! This module contains Ronin's business logic.
//! It knows nothing about any specific UI technology.
//!
//! ```text
//!                    ┌─────────────────────────┐
//!                    │         CORE            │
//!                    │  (this module)          │
//!                    │                         │
//!                    │  • State (app data)     │
//!                    │  • Action (events)      │
//!                    │  • update() (reducer)   │
//!                    │  • Prompt actions       │
//!                    │                         │
//!                    └───────────┬─────────────┘
//!                                │
//!            ┌───────────────────┼───────────────────┐
//!            ▼                   ▼                   ▼
//!     ┌────────────┐      ┌────────────┐      ┌────────────┐
//!     │    TUI     │      │  Catalog   │      │ Responder  │
//!     │  Adapter   │      │  (HTTP /   │      │  (child    │
//!     │ (ratatui)  │      │   config)  │      │  process)  │
//!     └────────────┘      └────────────┘      └────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`state`]: The `App` struct, all application state in one place
//! - [`action`]: The `Action` enum, everything that can happen in the app
//! - [`surface`]: Locator seam between prompt producers and the chat panel
//! - [`prompt_action`]: Selection-to-prompt editor actions
//! - [`conversation`]: The chat panel's controller
//! - [`models`]: Model list invariant and catalogs
//! - [`responder`]: External reply command runner
//! - [`config`]: Layered configuration

pub mod action;
pub mod config;
pub mod conversation;
pub mod models;
pub mod prompt_action;
pub mod responder;
pub mod state;
pub mod surface;
