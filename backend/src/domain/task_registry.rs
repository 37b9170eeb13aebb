//! Per-child task definitions.
//!
//! Functions here operate on a borrowed [`AppData`] for the duration of one
//! call. Validation of caller input happens in the `ChoreService`; the
//! registry accepts whatever it is given and applies the documented defaults.

use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info};

use crate::domain::commands::tasks::{TaskPatch, TaskSpec};
use crate::domain::errors::ChoreError;
use crate::domain::models::task::{DEFAULT_TASK_COLOR, DEFAULT_TASK_ICON, DEFAULT_TASK_POINTS};
use crate::domain::models::{AppData, Task, WeekdaySet};

/// Append a new task to the end of a child's task list
pub fn add_task(
    data: &mut AppData,
    child_id: &str,
    spec: &TaskSpec,
    task_id: String,
    now: DateTime<Utc>,
) -> Result<Task, ChoreError> {
    let child = data
        .child_mut(child_id)
        .ok_or_else(|| ChoreError::child_not_found(child_id))?;

    let task = Task {
        id: task_id,
        name: spec.name.trim().to_string(),
        points: spec.points.unwrap_or(DEFAULT_TASK_POINTS),
        icon: spec
            .icon
            .clone()
            .unwrap_or_else(|| DEFAULT_TASK_ICON.to_string()),
        color: spec
            .color
            .clone()
            .unwrap_or_else(|| DEFAULT_TASK_COLOR.to_string()),
        active_days: spec.active_days.unwrap_or_else(WeekdaySet::all),
        created_at: now,
    };

    info!("Adding task '{}' ({}) for child {}", task.name, task.id, child_id);
    child.tasks.push(task.clone());
    Ok(task)
}

/// Merge `patch` into the task. Returns false when the child or task is
/// unknown, in which case nothing changes.
pub fn update_task(data: &mut AppData, child_id: &str, task_id: &str, patch: &TaskPatch) -> bool {
    let Some(task) = data
        .child_mut(child_id)
        .and_then(|child| child.task_mut(task_id))
    else {
        debug!("update_task: no task {} for child {}", task_id, child_id);
        return false;
    };

    if let Some(name) = &patch.name {
        task.name = name.trim().to_string();
    }
    if let Some(points) = patch.points {
        task.points = points;
    }
    if let Some(icon) = &patch.icon {
        task.icon = icon.clone();
    }
    if let Some(color) = &patch.color {
        task.color = color.clone();
    }
    if let Some(days) = patch.active_days {
        task.active_days = days;
    }

    info!("Updated task {} for child {}", task_id, child_id);
    true
}

/// Remove a task and every completion that references it, for any child and
/// any date. Returns false when the task was not found.
pub fn delete_task(data: &mut AppData, child_id: &str, task_id: &str) -> bool {
    let Some(child) = data.child_mut(child_id) else {
        debug!("delete_task: unknown child {}", child_id);
        return false;
    };

    let before = child.tasks.len();
    child.tasks.retain(|task| task.id != task_id);
    if child.tasks.len() == before {
        debug!("delete_task: no task {} for child {}", task_id, child_id);
        return false;
    }

    let removed = data.completions.remove_task(task_id);
    info!(
        "Deleted task {} for child {} ({} completions removed)",
        task_id, child_id, removed
    );
    true
}

/// A child's tasks in insertion order. Unknown children have none.
pub fn list_tasks<'a>(data: &'a AppData, child_id: &str) -> &'a [Task] {
    data.child(child_id)
        .map(|child| child.tasks.as_slice())
        .unwrap_or(&[])
}

pub fn is_active_on(task: &Task, date: NaiveDate) -> bool {
    task.is_active_on(date)
}
