//! Conversions from scoring and progression results to their DTOs.

use chrono::NaiveDate;

use crate::domain::calendar;
use crate::domain::models::BadgeCount;
use crate::domain::scoring::{ChildSummary, DayView, LeaderboardEntry, Level, Points, WeekSummary};
use crate::io::rest::mappers::task_mapper::TaskMapper;
use shared::{
    BadgeCountDto, ChildSummaryResponse, DayViewResponse, LeaderboardEntryDto, LeaderboardResponse, LevelDto,
    PointsDto, TaskDayDto, WeekSummaryResponse,
};

pub struct ScoreMapper;

impl ScoreMapper {
    pub fn to_points_dto(points: Points) -> PointsDto {
        PointsDto {
            earned: points.earned,
            possible: points.possible,
        }
    }

    pub fn to_level_dto(level: Level) -> LevelDto {
        LevelDto {
            level: level.level,
            points: level.points,
            title: level.title.to_string(),
        }
    }

    pub fn to_badge_dtos(badges: &[BadgeCount]) -> Vec<BadgeCountDto> {
        badges
            .iter()
            .map(|badge| BadgeCountDto {
                id: badge.kind.id().to_string(),
                name: badge.kind.name().to_string(),
                icon: badge.kind.icon().to_string(),
                description: badge.kind.description().to_string(),
                count: badge.count,
            })
            .collect()
    }

    pub fn to_week_summary_response(child_id: &str, summary: &WeekSummary) -> WeekSummaryResponse {
        WeekSummaryResponse {
            child_id: child_id.to_string(),
            week_start: calendar::format_date(summary.week_start),
            week_number: summary.week_number,
            points: Self::to_points_dto(summary.points),
            bonus_points: summary.bonus_points,
            total_earned: summary.total_earned,
            total_possible: summary.total_possible,
            percentage: summary.percentage(),
            money: summary.money,
            max_money: summary.max_money,
        }
    }

    pub fn to_child_summary_response(summary: &ChildSummary) -> ChildSummaryResponse {
        ChildSummaryResponse {
            child_id: summary.child_id.clone(),
            lifetime_points: summary.lifetime_points,
            level: Self::to_level_dto(summary.level),
            level_progress: summary.level_progress,
            streak: summary.streak,
            badges: Self::to_badge_dtos(&summary.badges),
            badge_count: summary.badge_total(),
        }
    }

    pub fn to_day_view_response(view: &DayView) -> DayViewResponse {
        DayViewResponse {
            child_id: view.child_id.clone(),
            date: calendar::format_date(view.date),
            tasks: view
                .tasks
                .iter()
                .map(|status| TaskDayDto {
                    task: TaskMapper::to_dto(&status.task),
                    active: status.active,
                    completed: status.completed,
                })
                .collect(),
            points: Self::to_points_dto(view.points),
            perfect_day: view.perfect,
        }
    }

    pub fn to_leaderboard_entry_dto(entry: &LeaderboardEntry) -> LeaderboardEntryDto {
        LeaderboardEntryDto {
            id: entry.child_id.clone(),
            name: entry.name.clone(),
            avatar: entry.avatar.clone(),
            money: entry.week.money,
            max_money: entry.week.max_money,
            earned_points: entry.week.total_earned,
            possible_points: entry.week.total_possible,
            bonus_points: entry.week.bonus_points,
            percentage: entry.percentage,
            streak: entry.summary.streak,
            badges: Self::to_badge_dtos(&entry.summary.badges),
            badge_count: entry.summary.badge_total(),
            lifetime_points: entry.summary.lifetime_points,
            level: Self::to_level_dto(entry.summary.level),
            level_progress: entry.summary.level_progress,
        }
    }

    pub fn to_leaderboard_response(week_start: NaiveDate, entries: &[LeaderboardEntry]) -> LeaderboardResponse {
        LeaderboardResponse {
            week_start: calendar::format_date(week_start),
            entries: entries.iter().map(Self::to_leaderboard_entry_dto).collect(),
        }
    }
}
