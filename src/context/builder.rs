//! Context retrieval: user profile + task list + derived statistics

use super::models::{ContextStats, RetrievedContext, TaskContext, UserContext};
use crate::error::{OrganizerError, Result};
use crate::metrics::METRICS;
use crate::store::Store;
use chrono::Utc;
use std::sync::Arc;
use tracing::debug;

/// Builds a [`RetrievedContext`] from the store. Stateless; safe to share
/// across requests.
pub struct ContextBuilder {
    store: Arc<dyn Store>,
}

impl ContextBuilder {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Retrieve the complete context for a user: profile, tasks, and stats.
    ///
    /// The two store reads run concurrently; a failure in either aborts the
    /// whole operation so a partial context is never returned.
    pub async fn retrieve_complete_context(&self, user_id: &str) -> Result<RetrievedContext> {
        debug!("Retrieving context for user: {}", user_id);

        let (user, tasks) = tokio::try_join!(
            self.store.get_user(user_id),
            self.store.get_tasks_by_owner(user_id),
        )?;

        let user = user.ok_or_else(|| OrganizerError::NotFound(user_id.to_string()))?;

        // One snapshot instant for the whole build; every overdue flag in
        // this context is evaluated against the same "now".
        let now = Utc::now();
        let mut tasks: Vec<TaskContext> = tasks
            .into_iter()
            .map(|task| TaskContext::from_record(task, now))
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        let stats = ContextStats::from_tasks(&tasks);
        METRICS.context_retrievals.inc();

        Ok(RetrievedContext {
            user: UserContext::from(user),
            tasks,
            stats,
        })
    }
}
