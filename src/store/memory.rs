//! In-memory store accessor for tests and local development

use super::models::{TaskRecord, UserRecord};
use super::{Store, StoreError};
use async_trait::async_trait;
use std::collections::HashMap;

/// In-memory store keyed by user id
#[derive(Debug, Default)]
pub struct MemoryStore {
    users: HashMap<String, UserRecord>,
    tasks: HashMap<String, Vec<TaskRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a user record, keyed by its id
    pub fn insert_user(&mut self, user: UserRecord) {
        self.users.insert(user.id.clone(), user);
    }

    /// Replace the task list for a user
    pub fn insert_tasks(&mut self, user_id: &str, tasks: Vec<TaskRecord>) {
        self.tasks.insert(user_id.to_string(), tasks);
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        if user_id.is_empty() {
            return Err(StoreError::InvalidIdentifier(user_id.to_string()));
        }
        Ok(self.users.get(user_id).cloned())
    }

    async fn get_tasks_by_owner(&self, user_id: &str) -> Result<Vec<TaskRecord>, StoreError> {
        if user_id.is_empty() {
            return Err(StoreError::InvalidIdentifier(user_id.to_string()));
        }
        Ok(self.tasks.get(user_id).cloned().unwrap_or_default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::models::UserPreferences;

    fn user(id: &str) -> UserRecord {
        UserRecord {
            id: id.to_string(),
            name: "Test User".to_string(),
            email: "test@example.com".to_string(),
            level: 3,
            xp: 250,
            total_tasks_completed: 12,
            preferences: UserPreferences::default(),
        }
    }

    #[test]
    fn test_get_user_returns_none_for_unknown() {
        let store = MemoryStore::new();
        let result = tokio_test::block_on(store.get_user("missing"));
        assert!(matches!(result, Ok(None)));
    }

    #[test]
    fn test_get_user_roundtrip() {
        let mut store = MemoryStore::new();
        store.insert_user(user("u1"));

        let found = tokio_test::block_on(store.get_user("u1")).unwrap();
        assert_eq!(found.unwrap().name, "Test User");
    }

    #[test]
    fn test_empty_id_is_invalid() {
        let store = MemoryStore::new();
        let result = tokio_test::block_on(store.get_user(""));
        assert!(matches!(result, Err(StoreError::InvalidIdentifier(_))));

        let result = tokio_test::block_on(store.get_tasks_by_owner(""));
        assert!(matches!(result, Err(StoreError::InvalidIdentifier(_))));
    }

    #[test]
    fn test_tasks_default_to_empty() {
        let mut store = MemoryStore::new();
        store.insert_user(user("u1"));
        let tasks = tokio_test::block_on(store.get_tasks_by_owner("u1")).unwrap();
        assert!(tasks.is_empty());
    }
}
