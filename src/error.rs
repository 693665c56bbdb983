//! Error types for the organizer agent service

use crate::agent::backend::DispatchError;
use crate::store::StoreError;

/// Organizer agent error types
#[derive(Debug, thiserror::Error)]
pub enum OrganizerError {
    #[error("Invalid user ID format: {0}")]
    InvalidIdentifier(String),

    #[error("User not found: {0}")]
    NotFound(String),

    #[error("No AI provider configured. Set either DEEPSEEK_API_KEY or OPENROUTER_API_KEY")]
    NoProviderConfigured,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error(transparent)]
    Dispatch(#[from] DispatchError),

    #[error("Store error: {0}")]
    Store(String),
}

impl From<StoreError> for OrganizerError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidIdentifier(id) => Self::InvalidIdentifier(id),
            StoreError::Backend(message) => Self::Store(message),
        }
    }
}

pub type Result<T> = std::result::Result<T, OrganizerError>;
