//! Data models for retrieved context

use crate::store::models::{TaskPriority, TaskRecord, TaskStatus, UserPreferences, UserRecord};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Snapshot of a user for prompting purposes. Built fresh on every
/// retrieval, never cached across requests.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub id: String,
    pub name: String,
    pub email: String,
    pub level: i32,
    pub xp: i64,
    pub total_tasks_completed: i64,
    pub preferences: UserPreferences,
}

impl From<UserRecord> for UserContext {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            name: record.name,
            email: record.email,
            level: record.level,
            xp: record.xp,
            total_tasks_completed: record.total_tasks_completed,
            preferences: record.preferences,
        }
    }
}

/// A prompt-safe view of a task with its derived overdue flag.
///
/// `is_overdue` is computed once per retrieval against a single snapshot
/// instant; recomputing later may change the result, so callers must not
/// assume stability across calls.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskContext {
    pub id: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub status: TaskStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_time: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
    pub points: i32,
    pub tags: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub is_overdue: bool,
}

impl TaskContext {
    /// Derive the prompt view of a task record against a snapshot instant.
    pub fn from_record(record: TaskRecord, now: DateTime<Utc>) -> Self {
        let is_overdue = record
            .due_date
            .map(|due| due < now && record.status != TaskStatus::Completed)
            .unwrap_or(false);

        Self {
            id: record.id,
            title: record.title,
            description: record.description,
            priority: record.priority,
            status: record.status,
            task_time: record.task_time,
            due_date: record.due_date,
            completed_at: record.completed_at,
            points: record.points,
            tags: record.tags,
            created_at: record.created_at,
            updated_at: record.updated_at,
            is_overdue,
        }
    }
}

/// Aggregate counts over a task list
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContextStats {
    pub total: usize,
    pub pending: usize,
    pub in_progress: usize,
    pub completed: usize,
    pub overdue: usize,
}

impl ContextStats {
    /// Fold the stats from a task list. Computing them from the same list
    /// the formatter consumes keeps the counts consistent by construction.
    pub fn from_tasks(tasks: &[TaskContext]) -> Self {
        let mut stats = Self {
            total: tasks.len(),
            ..Self::default()
        };

        for task in tasks {
            match task.status {
                TaskStatus::Pending => stats.pending += 1,
                TaskStatus::InProgress => stats.in_progress += 1,
                TaskStatus::Completed => stats.completed += 1,
                TaskStatus::Cancelled => {}
            }
            if task.is_overdue {
                stats.overdue += 1;
            }
        }

        stats
    }
}

/// The aggregate passed to formatting. Ephemeral: built and consumed within
/// a single logical operation, never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievedContext {
    pub user: UserContext,
    /// Ordered newest-created first
    pub tasks: Vec<TaskContext>,
    pub stats: ContextStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn task(status: TaskStatus, due_date: Option<DateTime<Utc>>) -> TaskRecord {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        TaskRecord {
            id: "t1".to_string(),
            title: "Task".to_string(),
            description: None,
            priority: TaskPriority::Medium,
            status,
            task_time: None,
            due_date,
            completed_at: None,
            points: 10,
            tags: vec![],
            created_at: created,
            updated_at: created,
        }
    }

    #[test]
    fn test_overdue_requires_past_due_date() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let past = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        let future = Utc.with_ymd_and_hms(2024, 7, 1, 0, 0, 0).unwrap();

        let overdue = TaskContext::from_record(task(TaskStatus::Pending, Some(past)), now);
        assert!(overdue.is_overdue);

        let upcoming = TaskContext::from_record(task(TaskStatus::Pending, Some(future)), now);
        assert!(!upcoming.is_overdue);

        let undated = TaskContext::from_record(task(TaskStatus::Pending, None), now);
        assert!(!undated.is_overdue);
    }

    #[test]
    fn test_completed_task_is_never_overdue() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let past = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

        let completed = TaskContext::from_record(task(TaskStatus::Completed, Some(past)), now);
        assert!(!completed.is_overdue);

        // A cancelled task with a past due date still counts as overdue
        let cancelled = TaskContext::from_record(task(TaskStatus::Cancelled, Some(past)), now);
        assert!(cancelled.is_overdue);
    }

    #[test]
    fn test_due_exactly_now_is_not_overdue() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let at_now = TaskContext::from_record(task(TaskStatus::Pending, Some(now)), now);
        assert!(!at_now.is_overdue);
    }

    #[test]
    fn test_stats_partition_by_status() {
        let now = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
        let past = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();

        let tasks: Vec<TaskContext> = vec![
            TaskContext::from_record(task(TaskStatus::Pending, Some(past)), now),
            TaskContext::from_record(task(TaskStatus::Pending, None), now),
            TaskContext::from_record(task(TaskStatus::InProgress, None), now),
            TaskContext::from_record(task(TaskStatus::Completed, Some(past)), now),
            TaskContext::from_record(task(TaskStatus::Cancelled, None), now),
        ];

        let stats = ContextStats::from_tasks(&tasks);
        assert_eq!(stats.total, 5);
        assert_eq!(stats.pending, 2);
        assert_eq!(stats.in_progress, 1);
        assert_eq!(stats.completed, 1);
        assert_eq!(stats.overdue, 1);

        // The status partition covers the total
        let cancelled = tasks
            .iter()
            .filter(|t| t.status == TaskStatus::Cancelled)
            .count();
        assert_eq!(
            stats.pending + stats.in_progress + stats.completed + cancelled,
            stats.total
        );
    }
}
