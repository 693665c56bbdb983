//! Deterministic rendering of retrieved context into a prompt block

use super::models::{RetrievedContext, TaskContext};
use crate::store::models::TaskStatus;

/// Completed tasks shown per context; the rest collapse into a count line.
const COMPLETED_DISPLAY_LIMIT: usize = 10;

/// Render a retrieved context into the plain-text block embedded in the
/// system prompt. Pure and total: the same context always yields
/// byte-identical output.
pub fn format_context_for_prompt(context: &RetrievedContext) -> String {
    let user = &context.user;
    let stats = &context.stats;
    let mut prompt = String::new();

    prompt.push_str("# USER PROFILE\n");
    prompt.push_str(&format!("Name: {}\n", user.name));
    prompt.push_str(&format!("Level: {} | XP: {}\n", user.level, user.xp));
    prompt.push_str(&format!("Completed Tasks: {}\n", user.total_tasks_completed));
    prompt.push_str(&format!("Daily Goal: {} XP\n", user.preferences.daily_goal_xp));
    prompt.push_str(&format!("Timezone: {}\n\n", user.preferences.timezone));

    prompt.push_str("# TASK STATISTICS\n");
    prompt.push_str(&format!("Total Tasks: {}\n", stats.total));
    prompt.push_str(&format!(
        "Pending: {} | In Progress: {}\n",
        stats.pending, stats.in_progress
    ));
    prompt.push_str(&format!(
        "Completed: {} | Overdue: {}\n\n",
        stats.completed, stats.overdue
    ));

    prompt.push_str("# TASK LIST\n");

    if context.tasks.is_empty() {
        prompt.push_str("No tasks found.\n");
        return prompt;
    }

    // Cancelled tasks are counted in the statistics above but excluded from
    // the listing itself.
    let pending: Vec<&TaskContext> = by_status(context, TaskStatus::Pending);
    let in_progress: Vec<&TaskContext> = by_status(context, TaskStatus::InProgress);
    let completed: Vec<&TaskContext> = by_status(context, TaskStatus::Completed);

    if !pending.is_empty() {
        prompt.push_str(&format!("## PENDING TASKS ({})\n", pending.len()));
        for (idx, task) in pending.iter().enumerate() {
            format_task(&mut prompt, task, idx + 1);
        }
        prompt.push('\n');
    }

    if !in_progress.is_empty() {
        prompt.push_str(&format!("## IN PROGRESS TASKS ({})\n", in_progress.len()));
        for (idx, task) in in_progress.iter().enumerate() {
            format_task(&mut prompt, task, idx + 1);
        }
        prompt.push('\n');
    }

    if !completed.is_empty() {
        prompt.push_str(&format!("## COMPLETED TASKS ({})\n", completed.len()));
        for (idx, task) in completed.iter().take(COMPLETED_DISPLAY_LIMIT).enumerate() {
            format_task(&mut prompt, task, idx + 1);
        }
        if completed.len() > COMPLETED_DISPLAY_LIMIT {
            prompt.push_str(&format!(
                "... and {} more completed tasks\n",
                completed.len() - COMPLETED_DISPLAY_LIMIT
            ));
        }
        prompt.push('\n');
    }

    prompt
}

fn by_status(context: &RetrievedContext, status: TaskStatus) -> Vec<&TaskContext> {
    context
        .tasks
        .iter()
        .filter(|t| t.status == status)
        .collect()
}

fn format_task(out: &mut String, task: &TaskContext, index: usize) {
    out.push_str(&format!(
        "{}. [{}] {}\n",
        index,
        task.priority.as_str().to_uppercase(),
        task.title
    ));

    if let Some(description) = &task.description {
        out.push_str(&format!("   Description: {}\n", description));
    }

    if let Some(due) = task.due_date {
        out.push_str(&format!("   Due: {}", due.format("%Y-%m-%d")));
        if task.is_overdue {
            out.push_str(" ⚠️ OVERDUE");
        }
        out.push('\n');
    }

    if !task.tags.is_empty() {
        out.push_str(&format!("   Tags: {}\n", task.tags.join(", ")));
    }

    out.push_str(&format!("   Points: {} XP\n", task.points));
}
