//! MongoDB-backed store accessor

use super::models::{TaskPriority, TaskRecord, TaskStatus, UserPreferences, UserRecord};
use super::{Store, StoreError};
use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, DateTime as BsonDateTime};
use mongodb::{Client, Collection};
use serde::Deserialize;
use tracing::debug;

/// Read-only accessor over the `users` and `tasks` collections
pub struct MongoStore {
    users: Collection<UserDocument>,
    tasks: Collection<TaskDocument>,
}

impl MongoStore {
    /// Connect to MongoDB and bind the collections
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;
        let db = client.database(database);

        Ok(Self {
            users: db.collection("users"),
            tasks: db.collection("tasks"),
        })
    }

    fn parse_object_id(user_id: &str) -> Result<ObjectId, StoreError> {
        ObjectId::parse_str(user_id).map_err(|_| StoreError::InvalidIdentifier(user_id.to_string()))
    }
}

#[async_trait]
impl Store for MongoStore {
    async fn get_user(&self, user_id: &str) -> Result<Option<UserRecord>, StoreError> {
        let oid = Self::parse_object_id(user_id)?;

        // Security-sensitive fields are excluded by projection at the query
        // boundary; they never reach this process.
        let user = self
            .users
            .find_one(doc! { "_id": oid })
            .projection(doc! {
                "password": 0,
                "emailVerificationToken": 0,
                "passwordResetToken": 0,
            })
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        debug!("User lookup for {}: found={}", user_id, user.is_some());
        Ok(user.map(UserRecord::from))
    }

    async fn get_tasks_by_owner(&self, user_id: &str) -> Result<Vec<TaskRecord>, StoreError> {
        let oid = Self::parse_object_id(user_id)?;

        let mut cursor = self
            .tasks
            .find(doc! { "userId": oid })
            .sort(doc! { "createdAt": -1 })
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let mut tasks = Vec::new();
        while let Some(task) = cursor
            .try_next()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))?
        {
            tasks.push(TaskRecord::from(task));
        }

        debug!("Task lookup for {}: {} tasks", user_id, tasks.len());
        Ok(tasks)
    }
}

/// Wire shape of a user document. Credential fields have no counterpart here
/// and are additionally excluded by projection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    name: String,
    email: String,
    #[serde(default = "default_level")]
    level: i32,
    #[serde(default)]
    xp: i64,
    #[serde(default)]
    total_tasks_completed: i64,
    #[serde(default)]
    preferences: PreferencesDocument,
}

#[derive(Debug, Deserialize)]
struct PreferencesDocument {
    #[serde(default = "default_timezone")]
    timezone: String,
    #[serde(rename = "dailyGoalXP", default = "default_daily_goal_xp")]
    daily_goal_xp: i32,
}

/// Wire shape of a task document
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskDocument {
    #[serde(rename = "_id")]
    id: ObjectId,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default = "default_priority")]
    priority: TaskPriority,
    #[serde(default = "default_status")]
    status: TaskStatus,
    #[serde(default)]
    task_time: Option<BsonDateTime>,
    #[serde(default)]
    due_date: Option<BsonDateTime>,
    #[serde(default)]
    completed_at: Option<BsonDateTime>,
    #[serde(default = "default_points")]
    points: i32,
    #[serde(default)]
    tags: Vec<String>,
    created_at: BsonDateTime,
    updated_at: BsonDateTime,
}

// Schema defaults mirrored from the application's collection validators
fn default_level() -> i32 { 1 }
fn default_timezone() -> String { "UTC".to_string() }
fn default_daily_goal_xp() -> i32 { 100 }
fn default_priority() -> TaskPriority { TaskPriority::Medium }
fn default_status() -> TaskStatus { TaskStatus::Pending }
fn default_points() -> i32 { 10 }

impl Default for PreferencesDocument {
    fn default() -> Self {
        Self {
            timezone: default_timezone(),
            daily_goal_xp: default_daily_goal_xp(),
        }
    }
}

impl From<UserDocument> for UserRecord {
    fn from(doc: UserDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            name: doc.name,
            email: doc.email,
            level: doc.level,
            xp: doc.xp,
            total_tasks_completed: doc.total_tasks_completed,
            preferences: UserPreferences {
                timezone: doc.preferences.timezone,
                daily_goal_xp: doc.preferences.daily_goal_xp,
            },
        }
    }
}

impl From<TaskDocument> for TaskRecord {
    fn from(doc: TaskDocument) -> Self {
        Self {
            id: doc.id.to_hex(),
            title: doc.title,
            description: doc.description,
            priority: doc.priority,
            status: doc.status,
            task_time: doc.task_time.map(|t| t.to_chrono()),
            due_date: doc.due_date.map(|t| t.to_chrono()),
            completed_at: doc.completed_at.map(|t| t.to_chrono()),
            points: doc.points,
            tags: doc.tags,
            created_at: doc.created_at.to_chrono(),
            updated_at: doc.updated_at.to_chrono(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_object_id_rejects_malformed() {
        let result = MongoStore::parse_object_id("not-an-object-id");
        assert!(matches!(result, Err(StoreError::InvalidIdentifier(_))));
    }

    #[test]
    fn test_parse_object_id_accepts_hex() {
        let result = MongoStore::parse_object_id("507f1f77bcf86cd799439011");
        assert!(result.is_ok());
    }

    #[test]
    fn test_task_document_conversion() {
        let now = BsonDateTime::now();
        let doc = TaskDocument {
            id: ObjectId::new(),
            title: "Write report".to_string(),
            description: None,
            priority: TaskPriority::High,
            status: TaskStatus::Pending,
            task_time: None,
            due_date: Some(now),
            completed_at: None,
            points: 25,
            tags: vec!["work".to_string()],
            created_at: now,
            updated_at: now,
        };

        let record = TaskRecord::from(doc);
        assert_eq!(record.title, "Write report");
        assert_eq!(record.priority, TaskPriority::High);
        assert!(record.due_date.is_some());
        assert!(record.completed_at.is_none());
        assert_eq!(record.points, 25);
    }
}
