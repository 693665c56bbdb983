//! Context retrieval and prompt formatting
//!
//! Assembles the bundle of user profile, task data, and derived statistics
//! consumed by the organizer agent, and renders it into a deterministic
//! plain-text block for prompting.

pub mod builder;
pub mod formatter;
pub mod models;

pub use builder::ContextBuilder;
pub use formatter::format_context_for_prompt;
pub use models::{ContextStats, RetrievedContext, TaskContext, UserContext};
