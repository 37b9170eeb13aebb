//! Wire types shared between the chore tracker backend and its clients.
//!
//! Dates travel as `YYYY-MM-DD` strings and timestamps as RFC 3339 strings.
//! Weekday indices use 0 = Sunday through 6 = Saturday.

use serde::{Deserialize, Serialize};

/// Task ID in format: "task::<uuid>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDto {
    pub id: String,
    pub name: String,
    pub points: u32,
    pub icon: String,
    pub color: String,
    /// Active weekday indices, ascending
    pub active_days: Vec<u8>,
    /// RFC 3339
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildDto {
    pub id: String,
    pub name: String,
    pub avatar: String,
    /// Weekly allowance ceiling in dollars
    pub allowance: f64,
    pub tasks: Vec<TaskDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildListResponse {
    pub children: Vec<ChildDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskRequest {
    /// Every listed child gets its own copy of the task
    pub child_ids: Vec<String>,
    pub name: String,
    /// Defaults to 10
    pub points: Option<u32>,
    pub icon: Option<String>,
    pub color: Option<String>,
    /// Defaults to every day; an empty list is rejected
    pub active_days: Option<Vec<u8>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateTaskResponse {
    pub tasks: Vec<TaskDto>,
    pub success_message: String,
}

/// Partial task update; absent fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UpdateTaskRequest {
    pub name: Option<String>,
    pub points: Option<u32>,
    pub icon: Option<String>,
    pub color: Option<String>,
    pub active_days: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ToggleCompletionRequest {
    /// Defaults to today
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToggleCompletionResponse {
    pub child_id: String,
    pub task_id: String,
    pub date: String,
    pub completed: bool,
    pub day_points: PointsDto,
    pub perfect_day: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointsDto {
    pub earned: u32,
    pub possible: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskDayDto {
    pub task: TaskDto,
    pub active: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayViewResponse {
    pub child_id: String,
    pub date: String,
    pub tasks: Vec<TaskDayDto>,
    pub points: PointsDto,
    pub perfect_day: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeekSummaryResponse {
    pub child_id: String,
    pub week_start: String,
    pub week_number: u32,
    /// Task points only
    pub points: PointsDto,
    /// Net adjustments since the current week started
    pub bonus_points: i64,
    pub total_earned: i64,
    pub total_possible: i64,
    pub percentage: i64,
    pub money: f64,
    pub max_money: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDto {
    pub level: u32,
    /// Lifetime points needed to reach this level
    pub points: u32,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BadgeCountDto {
    /// Badge type id, e.g. "perfect_day"
    pub id: String,
    pub name: String,
    pub icon: String,
    pub description: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildSummaryResponse {
    pub child_id: String,
    pub lifetime_points: u32,
    pub level: LevelDto,
    /// Percentage towards the next level, 0-100
    pub level_progress: u32,
    pub streak: u32,
    pub badges: Vec<BadgeCountDto>,
    pub badge_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardEntryDto {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub money: f64,
    pub max_money: f64,
    /// Task points plus weekly adjustments
    pub earned_points: i64,
    pub possible_points: i64,
    pub bonus_points: i64,
    pub percentage: i64,
    pub streak: u32,
    pub badges: Vec<BadgeCountDto>,
    pub badge_count: usize,
    pub lifetime_points: u32,
    pub level: LevelDto,
    pub level_progress: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub week_start: String,
    pub entries: Vec<LeaderboardEntryDto>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdjustmentType {
    Bonus,
    Penalty,
}

/// Adjustment ID in format: "adj::<epoch_millis>::<suffix>"
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentDto {
    pub id: String,
    pub child_id: String,
    pub amount: u32,
    pub reason: String,
    pub adjustment_type: AdjustmentType,
    /// RFC 3339
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateAdjustmentRequest {
    pub child_id: String,
    pub amount: u32,
    pub reason: String,
    pub adjustment_type: AdjustmentType,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentListRequest {
    pub child_id: Option<String>,
    /// Defaults to 20
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjustmentListResponse {
    pub adjustments: Vec<AdjustmentDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateAllowancesRequest {
    /// Child id to weekly allowance ceiling
    pub allowances: std::collections::BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsResponse {
    pub allowances: std::collections::BTreeMap<String, f64>,
    pub week_start: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewWeekResponse {
    pub week_start: String,
    pub success_message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncStatusResponse {
    /// "connected" or "offline"
    pub status: String,
    pub enabled: bool,
    pub syncing: bool,
    /// Epoch millis of the newest remote write seen or produced
    pub last_seen: Option<i64>,
    pub remote: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adjustment_type_is_lowercase() {
        assert_eq!(serde_json::to_string(&AdjustmentType::Penalty).unwrap(), "\"penalty\"");
        let parsed: AdjustmentType = serde_json::from_str("\"bonus\"").unwrap();
        assert_eq!(parsed, AdjustmentType::Bonus);
    }

    #[test]
    fn test_create_task_request_optional_fields() {
        let request: CreateTaskRequest = serde_json::from_str(r#"{"child_ids":["olive"],"name":"Dishes"}"#).unwrap();
        assert_eq!(request.points, None);
        assert_eq!(request.active_days, None);
    }
}
