//! Completion toggling.
//!
//! Every toggle re-evaluates the child's badges for the toggled date so the
//! badge ledger never lags behind the completion ledger.

use chrono::{DateTime, NaiveDate, Utc};
use log::info;

use crate::domain::errors::ChoreError;
use crate::domain::models::{AppData, CompletionKey};
use crate::domain::progression;

/// Flip completion of `task_id` for `child_id` on `date` and return the new
/// completed state
pub fn toggle(
    data: &mut AppData,
    child_id: &str,
    task_id: &str,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<bool, ChoreError> {
    let child = data
        .child(child_id)
        .ok_or_else(|| ChoreError::child_not_found(child_id))?;
    if child.task(task_id).is_none() {
        return Err(ChoreError::task_not_found(task_id));
    }

    let completed = data
        .completions
        .toggle(CompletionKey::new(child_id, task_id, date), now);
    info!(
        "Task {} for child {} on {} is now {}",
        task_id,
        child_id,
        date,
        if completed { "completed" } else { "not completed" }
    );

    progression::evaluate_badges(data, child_id, date, now);
    Ok(completed)
}

pub fn is_completed(data: &AppData, child_id: &str, task_id: &str, date: NaiveDate) -> bool {
    data.completions
        .contains(&CompletionKey::new(child_id, task_id, date))
}
