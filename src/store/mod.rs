//! Read access to the user/task document store
//!
//! The organizer agent only reads: one user record by id, and that user's
//! tasks. Task lifecycle mutations belong to the task CRUD routes and are
//! not part of this service.

pub mod memory;
pub mod models;
pub mod mongo;

use async_trait::async_trait;
use models::{TaskRecord, UserRecord};

pub use memory::MemoryStore;
pub use mongo::MongoStore;

/// Store error types
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Invalid user ID format: {0}")]
    InvalidIdentifier(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

/// Read interface over the persistent store.
///
/// `get_user` must exclude security-sensitive fields (password hash,
/// verification/reset tokens) at the query boundary, never as a later
/// filtering step.
#[async_trait]
pub trait Store: Send + Sync {
    /// Fetch one user record by id. `None` when no record exists.
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError>;

    /// Fetch all tasks owned by a user, newest created first.
    async fn get_tasks_by_owner(&self, user_id: &str) -> Result<Vec<TaskRecord>, StoreError>;
}
