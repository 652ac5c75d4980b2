//! # HELD REPL
//!
//! The interactive session: command parsing, session state, lookup
//! submission and completion, and rendering of results.
//!
//! - **models**: session settings, requests and outcomes
//! - **services**: HELD transport, reference dereferencing, request tracking
//! - **views**: prompt, help and result rendering
//! - **controller**: the read-execute loop tying them together

pub mod command;
pub mod controller;
pub mod models;
pub mod services;
pub mod views;

// Re-export core types
pub use command::{Command, UsageError};
pub use controller::ReplController;
pub use models::*;
pub use services::*;
pub use views::{RenderContext, ResultRenderer};
