//! Organizer agent service for LVL.AI
//!
//! Retrieves a user's profile and task set from the document store, derives
//! presentation statistics (overdue detection, status grouping), formats a
//! bounded natural-language context block, and dispatches it to one of two
//! interchangeable AI backends with a uniform fallback/error contract.

pub mod agent;
pub mod api;
pub mod config;
pub mod context;
pub mod error;
pub mod metrics;
pub mod middleware;
pub mod store;

pub use error::{OrganizerError, Result};
