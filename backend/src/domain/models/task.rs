//! Domain model for a recurring chore belonging to one child.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::weekday::WeekdaySet;

pub const DEFAULT_TASK_POINTS: u32 = 10;
/// Largest point value a single task may carry
pub const MAX_TASK_POINTS: u32 = 1_000;
pub const DEFAULT_TASK_ICON: &str = "📝";
pub const DEFAULT_TASK_COLOR: &str = "#4ade80";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "StoredTask")]
pub struct Task {
    pub id: String,
    pub name: String,
    pub points: u32,
    pub icon: String,
    pub color: String,
    pub active_days: WeekdaySet,
    pub created_at: DateTime<Utc>,
}

impl Task {
    /// Generate a task ID. Tasks added to several children in the same
    /// millisecond still get distinct IDs.
    pub fn generate_id() -> String {
        format!("task::{}", Uuid::new_v4().simple())
    }

    pub fn is_active_on(&self, date: NaiveDate) -> bool {
        self.active_days.includes_date(date)
    }
}

/// On-disk shape of a task, tolerant of documents written before
/// `activeDays` existed (and of the even older `weekdaysOnly` flag).
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredTask {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(default)]
    points: Option<u32>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    color: Option<String>,
    #[serde(default)]
    active_days: Option<WeekdaySet>,
    #[serde(default)]
    weekdays_only: bool,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

impl From<StoredTask> for Task {
    fn from(stored: StoredTask) -> Self {
        let active_days = match stored.active_days {
            Some(days) => days,
            None if stored.weekdays_only => WeekdaySet::weekdays(),
            None => WeekdaySet::all(),
        };

        Task {
            id: stored.id,
            name: stored.name,
            points: stored.points.unwrap_or(DEFAULT_TASK_POINTS),
            icon: stored.icon.unwrap_or_else(|| DEFAULT_TASK_ICON.to_string()),
            color: stored.color.unwrap_or_else(|| DEFAULT_TASK_COLOR.to_string()),
            active_days,
            created_at: stored.created_at.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Weekday;

    #[test]
    fn test_missing_active_days_means_every_day() {
        let task: Task = serde_json::from_str(
            r##"{"id":"task_1","name":"Brush teeth","points":5,"icon":"🦷","color":"#fff"}"##,
        )
        .unwrap();
        assert_eq!(task.active_days, WeekdaySet::all());
        assert_eq!(task.points, 5);
    }

    #[test]
    fn test_legacy_weekdays_only_flag() {
        let task: Task =
            serde_json::from_str(r#"{"id":"task_2","name":"Homework","weekdaysOnly":true}"#).unwrap();
        assert!(!task.active_days.contains(Weekday::Sat));
        assert!(task.active_days.contains(Weekday::Mon));
        assert_eq!(task.points, DEFAULT_TASK_POINTS);
        assert_eq!(task.icon, DEFAULT_TASK_ICON);
        assert_eq!(task.color, DEFAULT_TASK_COLOR);
    }

    #[test]
    fn test_explicit_active_days_win_over_legacy_flag() {
        let task: Task = serde_json::from_str(
            r#"{"id":"task_3","name":"Bins","activeDays":[0],"weekdaysOnly":true}"#,
        )
        .unwrap();
        assert_eq!(task.active_days.indices(), vec![0]);
    }

    #[test]
    fn test_serialized_shape_is_camel_case() {
        let task = Task {
            id: "task::abc".to_string(),
            name: "Feed cat".to_string(),
            points: 10,
            icon: DEFAULT_TASK_ICON.to_string(),
            color: DEFAULT_TASK_COLOR.to_string(),
            active_days: WeekdaySet::weekdays(),
            created_at: DateTime::<Utc>::default(),
        };
        let value = serde_json::to_value(&task).unwrap();
        assert_eq!(value["activeDays"], serde_json::json!([1, 2, 3, 4, 5]));
        assert!(value.get("createdAt").is_some());

        let back: Task = serde_json::from_value(value).unwrap();
        assert_eq!(back, task);
    }

    #[test]
    fn test_generated_ids_are_distinct() {
        assert_ne!(Task::generate_id(), Task::generate_id());
        assert!(Task::generate_id().starts_with("task::"));
    }
}
