//! Scoring engine.
//!
//! Turns the sparse completion facts into daily, weekly and lifetime point
//! totals and derives the weekly allowance, the level and the leaderboard.
//! Everything here is a read-only function of the state plus the query date;
//! nothing derived is stored.
//!
//! ## Weekly money
//!
//! Manual adjustments made during the week inflate both the earned and the
//! possible totals, so a bonus can never push the payout above the ceiling:
//!
//! ```text
//! money = allowance * clamp((earned + bonus) / (possible + bonus), 0, 1)
//! ```

use chrono::NaiveDate;

use crate::domain::adjustment_ledger;
use crate::domain::calendar;
use crate::domain::completion_ledger::is_completed;
use crate::domain::models::{AppData, BadgeCount, Task};
use crate::domain::progression;

/// Earned versus possible points for a span of days. Sums saturate at
/// `u32::MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Points {
    pub earned: u32,
    pub possible: u32,
}

impl std::ops::AddAssign for Points {
    fn add_assign(&mut self, other: Self) {
        self.earned = self.earned.saturating_add(other.earned);
        self.possible = self.possible.saturating_add(other.possible);
    }
}

pub fn day_points(data: &AppData, child_id: &str, date: NaiveDate) -> Points {
    let Some(child) = data.child(child_id) else {
        return Points::default();
    };

    child
        .tasks
        .iter()
        .filter(|task| task.is_active_on(date))
        .fold(Points::default(), |mut acc, task| {
            let earned = if is_completed(data, child_id, &task.id, date) {
                task.points
            } else {
                0
            };
            acc += Points {
                earned,
                possible: task.points,
            };
            acc
        })
}

/// Points for the seven days starting at `week_start`. Days after `today`
/// contribute their possible points but nothing earned.
pub fn week_points(data: &AppData, child_id: &str, week_start: NaiveDate, today: NaiveDate) -> Points {
    let mut total = Points::default();
    for date in calendar::week_dates(week_start) {
        let day = day_points(data, child_id, date);
        total += Points {
            earned: if date <= today { day.earned } else { 0 },
            possible: day.possible,
        };
    }
    total
}

/// Points from every recorded completion of a task the child still has, plus
/// all adjustments, floored at zero
pub fn lifetime_points(data: &AppData, child_id: &str) -> u32 {
    let Some(child) = data.child(child_id) else {
        return 0;
    };

    let from_tasks: i64 = data
        .completions
        .for_child(child_id)
        .filter_map(|key| child.task(&key.task_id))
        .map(|task| task.points as i64)
        .sum();
    let total = from_tasks + adjustment_ledger::total_for(data, child_id);

    total.clamp(0, u32::MAX as i64) as u32
}

/// Net adjustment recorded since the current week started
pub fn weekly_bonus(data: &AppData, child_id: &str, today: NaiveDate) -> i64 {
    adjustment_ledger::total_since(data, child_id, data.effective_week_start(today))
}

/// Prorated allowance for a fraction of points, rounded to cents
pub fn money_for(allowance: f64, earned: i64, possible: i64) -> f64 {
    if possible <= 0 {
        return 0.0;
    }
    let ratio = (earned as f64 / possible as f64).clamp(0.0, 1.0);
    round_cents(allowance * ratio)
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

/// The current week's totals with adjustments folded in
#[derive(Debug, Clone, PartialEq)]
pub struct WeekSummary {
    pub week_start: NaiveDate,
    pub week_number: u32,
    pub points: Points,
    pub bonus_points: i64,
    pub total_earned: i64,
    pub total_possible: i64,
    pub money: f64,
    pub max_money: f64,
}

impl WeekSummary {
    /// Completion percentage, 100 when nothing was possible
    pub fn percentage(&self) -> i64 {
        if self.total_possible > 0 {
            (self.total_earned as f64 / self.total_possible as f64 * 100.0).round() as i64
        } else {
            100
        }
    }
}

/// Summarise the week starting at `week_start`. Adjustments are always taken
/// from the current week.
pub fn week_summary(data: &AppData, child_id: &str, week_start: NaiveDate, today: NaiveDate) -> WeekSummary {
    let points = week_points(data, child_id, week_start, today);
    let bonus_points = weekly_bonus(data, child_id, today);
    let total_earned = points.earned as i64 + bonus_points;
    let total_possible = points.possible as i64 + bonus_points;
    let max_money = data.allowance(child_id);

    WeekSummary {
        week_start,
        week_number: calendar::week_number(week_start),
        points,
        bonus_points,
        total_earned,
        total_possible,
        money: money_for(max_money, total_earned, total_possible),
        max_money,
    }
}

pub fn weekly_money(data: &AppData, child_id: &str, today: NaiveDate) -> f64 {
    week_summary(data, child_id, data.effective_week_start(today), today).money
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Level {
    pub level: u32,
    pub points: u32,
    pub title: &'static str,
}

const fn lvl(level: u32, points: u32, title: &'static str) -> Level {
    Level { level, points, title }
}

/// Ascending level thresholds on lifetime points
pub const LEVELS: [Level; 25] = [
    lvl(1, 0, "Rookie"),
    lvl(2, 20, "Starter"),
    lvl(3, 50, "Helper"),
    lvl(4, 90, "Go-Getter"),
    lvl(5, 140, "Rising Star"),
    lvl(6, 200, "Task Tackler"),
    lvl(7, 280, "Champion"),
    lvl(8, 370, "Super Star"),
    lvl(9, 480, "Achiever"),
    lvl(10, 600, "Hero"),
    lvl(11, 740, "Warrior"),
    lvl(12, 900, "Legend"),
    lvl(13, 1080, "Superstar"),
    lvl(14, 1280, "Master"),
    lvl(15, 1500, "Grand Master"),
    lvl(16, 1700, "Elite"),
    lvl(17, 1850, "Champion Elite"),
    lvl(18, 2000, "Task Titan"),
    lvl(19, 2100, "Mega Star"),
    lvl(20, 2200, "Ultra Champion"),
    lvl(21, 2280, "Task Wizard"),
    lvl(22, 2340, "Supreme Master"),
    lvl(23, 2380, "Task Legend"),
    lvl(24, 2410, "Ultimate Hero"),
    lvl(25, 2440, "Task God"),
];

fn level_index(points: u32) -> usize {
    LEVELS
        .iter()
        .rposition(|level| points >= level.points)
        .unwrap_or(0)
}

/// Highest level whose threshold is at or below `points`
pub fn level(points: u32) -> Level {
    LEVELS[level_index(points)]
}

/// Rounded percentage of the way from the current level to the next; 100 at
/// the top level
pub fn level_progress(points: u32) -> u32 {
    let index = level_index(points);
    let Some(next) = LEVELS.get(index + 1) else {
        return 100;
    };
    let current = LEVELS[index];
    let span = (next.points - current.points) as f64;
    let progress = (points.saturating_sub(current.points)) as f64 / span * 100.0;
    progress.round().clamp(0.0, 100.0) as u32
}

/// How a single task stands on one date
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDayStatus {
    pub task: Task,
    pub active: bool,
    pub completed: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DayView {
    pub child_id: String,
    pub date: NaiveDate,
    pub tasks: Vec<TaskDayStatus>,
    pub points: Points,
    pub perfect: bool,
}

pub fn day_view(data: &AppData, child_id: &str, date: NaiveDate) -> Option<DayView> {
    let child = data.child(child_id)?;
    let tasks = child
        .tasks
        .iter()
        .map(|task| TaskDayStatus {
            task: task.clone(),
            active: task.is_active_on(date),
            completed: is_completed(data, child_id, &task.id, date),
        })
        .collect();

    Some(DayView {
        child_id: child_id.to_string(),
        date,
        tasks,
        points: day_points(data, child_id, date),
        perfect: progression::is_perfect_day(data, child_id, date),
    })
}

/// Progression figures for one child
#[derive(Debug, Clone, PartialEq)]
pub struct ChildSummary {
    pub child_id: String,
    pub lifetime_points: u32,
    pub level: Level,
    pub level_progress: u32,
    pub streak: u32,
    pub badges: Vec<BadgeCount>,
}

impl ChildSummary {
    pub fn badge_total(&self) -> usize {
        self.badges.iter().map(|badge| badge.count).sum()
    }
}

pub fn child_summary(data: &AppData, child_id: &str, today: NaiveDate) -> ChildSummary {
    let lifetime = lifetime_points(data, child_id);
    ChildSummary {
        child_id: child_id.to_string(),
        lifetime_points: lifetime,
        level: level(lifetime),
        level_progress: level_progress(lifetime),
        streak: progression::current_streak(data, child_id, today),
        badges: progression::kid_badges(data, child_id),
    }
}

/// One leaderboard row
#[derive(Debug, Clone, PartialEq)]
pub struct LeaderboardEntry {
    pub child_id: String,
    pub name: String,
    pub avatar: String,
    pub week: WeekSummary,
    pub percentage: i64,
    pub summary: ChildSummary,
}

/// One row per child, highest weekly completion percentage first. Ties keep
/// the children's stored order.
pub fn leaderboard(data: &AppData, today: NaiveDate) -> Vec<LeaderboardEntry> {
    let week_start = data.effective_week_start(today);
    let mut rows: Vec<LeaderboardEntry> = data
        .children
        .iter()
        .map(|(child_id, child)| {
            let week = week_summary(data, child_id, week_start, today);
            LeaderboardEntry {
                child_id: child_id.clone(),
                name: child.name.clone(),
                avatar: child.avatar.clone(),
                percentage: week.percentage(),
                week,
                summary: child_summary(data, child_id, today),
            }
        })
        .collect();

    rows.sort_by(|a, b| b.percentage.cmp(&a.percentage));
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::tasks::TaskSpec;
    use crate::domain::models::{AdjustmentKind, ChildProfile, CompletionKey, PointAdjustment, WeekdaySet};
    use crate::domain::task_registry;
    use chrono::{DateTime, Duration, Local, TimeZone, Utc};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn noon(day: NaiveDate) -> DateTime<Utc> {
        Local
            .from_local_datetime(&day.and_hms_opt(12, 0, 0).unwrap())
            .unwrap()
            .with_timezone(&Utc)
    }

    // Wednesday
    const TODAY: &str = "2026-10-14";
    const MONDAY: &str = "2026-10-12";

    fn setup() -> AppData {
        AppData::for_roster(&ChildProfile::default_roster(), date(TODAY))
    }

    fn add(data: &mut AppData, child: &str, id: &str, points: u32, days: WeekdaySet) {
        let spec = TaskSpec {
            name: id.to_string(),
            points: Some(points),
            active_days: Some(days),
            ..TaskSpec::default()
        };
        task_registry::add_task(data, child, &spec, id.to_string(), Utc::now()).unwrap();
    }

    fn complete(data: &mut AppData, child: &str, task: &str, day: NaiveDate) {
        data.completions
            .insert(CompletionKey::new(child, task, day), Utc::now());
    }

    fn adjust(data: &mut AppData, child: &str, amount: u32, kind: AdjustmentKind, at: DateTime<Utc>) {
        data.point_adjustments.insert(
            0,
            PointAdjustment {
                id: PointAdjustment::generate_id(at.timestamp_millis()),
                child_id: child.to_string(),
                amount,
                reason: "test".to_string(),
                kind,
                created_at: at,
            },
        );
    }

    #[test]
    fn test_day_points_toggle_scenario() {
        let mut data = setup();
        add(&mut data, "olive", "task::a", 10, WeekdaySet::weekdays());
        let wednesday = date(TODAY);

        crate::domain::completion_ledger::toggle(&mut data, "olive", "task::a", wednesday, Utc::now()).unwrap();
        assert_eq!(day_points(&data, "olive", wednesday), Points { earned: 10, possible: 10 });

        crate::domain::completion_ledger::toggle(&mut data, "olive", "task::a", wednesday, Utc::now()).unwrap();
        assert_eq!(day_points(&data, "olive", wednesday), Points { earned: 0, possible: 10 });
    }

    #[test]
    fn test_day_without_active_tasks_is_zero() {
        let mut data = setup();
        add(&mut data, "olive", "task::a", 10, WeekdaySet::weekdays());
        assert_eq!(day_points(&data, "olive", date("2026-10-17")), Points::default());
        assert_eq!(day_points(&data, "nobody", date(TODAY)), Points::default());
    }

    #[test]
    fn test_week_possible_ignores_completions() {
        let mut data = setup();
        add(&mut data, "olive", "task::a", 10, WeekdaySet::weekdays());
        add(&mut data, "olive", "task::b", 5, WeekdaySet::all());
        let monday = date(MONDAY);
        let today = date(TODAY);

        let empty = week_points(&data, "olive", monday, today);
        assert_eq!(empty, Points { earned: 0, possible: 85 });

        complete(&mut data, "olive", "task::a", monday);
        complete(&mut data, "olive", "task::b", today);
        let partial = week_points(&data, "olive", monday, today);
        assert_eq!(partial.possible, empty.possible);
        assert_eq!(partial.earned, 15);
    }

    #[test]
    fn test_oversized_stored_tasks_saturate() {
        // Stored or synced documents bypass service validation
        let mut data = setup();
        add(&mut data, "olive", "task::huge", 1_000_000_000, WeekdaySet::all());
        add(&mut data, "olive", "task::more", 1_000_000_000, WeekdaySet::all());
        let today = date(TODAY);
        complete(&mut data, "olive", "task::huge", today);

        let day = day_points(&data, "olive", today);
        assert_eq!(day, Points { earned: 1_000_000_000, possible: 2_000_000_000 });

        let week = week_points(&data, "olive", date(MONDAY), today);
        assert_eq!(week.possible, u32::MAX);
        assert_eq!(week.earned, 1_000_000_000);
        assert_eq!(leaderboard(&data, today).len(), 3);
    }

    #[test]
    fn test_future_days_earn_nothing() {
        let mut data = setup();
        add(&mut data, "olive", "task::a", 10, WeekdaySet::all());
        // A completion recorded ahead of time on Friday
        complete(&mut data, "olive", "task::a", date("2026-10-16"));
        let points = week_points(&data, "olive", date(MONDAY), date(TODAY));
        assert_eq!(points, Points { earned: 0, possible: 70 });
    }

    #[test]
    fn test_lifetime_points_include_adjustments_and_floor_at_zero() {
        let mut data = setup();
        add(&mut data, "olive", "task::a", 10, WeekdaySet::all());
        for back in 0..4 {
            complete(&mut data, "olive", "task::a", date(TODAY) - Duration::days(back));
        }
        // Completion for a task that no longer exists contributes nothing
        complete(&mut data, "olive", "task::gone", date(TODAY));
        adjust(&mut data, "olive", 5, AdjustmentKind::Bonus, Utc::now());
        adjust(&mut data, "olive", 2, AdjustmentKind::Penalty, Utc::now());
        assert_eq!(lifetime_points(&data, "olive"), 43);

        adjust(&mut data, "miles", 50, AdjustmentKind::Penalty, Utc::now());
        assert_eq!(lifetime_points(&data, "miles"), 0);
    }

    #[test]
    fn test_money_scenarios() {
        assert_eq!(money_for(50.0, 25, 50), 25.0);
        assert_eq!(money_for(50.0, 30, 55), 27.27);
        assert_eq!(money_for(50.0, 10, 0), 0.0);
        assert_eq!(money_for(50.0, -5, 20), 0.0);
        assert_eq!(money_for(50.0, 80, 50), 50.0);
    }

    #[test]
    fn test_money_is_monotonic_in_earned() {
        let mut previous = 0.0;
        for earned in -10..=60 {
            let money = money_for(50.0, earned, 50);
            assert!(money >= previous, "earned {}", earned);
            previous = money;
        }
    }

    #[test]
    fn test_weekly_money_folds_in_current_week_bonus() {
        let mut data = setup();
        // 5 points a day, every day: 35 possible
        add(&mut data, "olive", "task::a", 5, WeekdaySet::all());
        for day in calendar::week_dates(date(MONDAY)).iter().take(3) {
            complete(&mut data, "olive", "task::a", *day);
        }
        // Last week's bonus is ignored
        adjust(&mut data, "olive", 20, AdjustmentKind::Bonus, noon(date("2026-10-09")));
        adjust(&mut data, "olive", 5, AdjustmentKind::Bonus, noon(date(TODAY)));

        let summary = week_summary(&data, "olive", date(MONDAY), date(TODAY));
        assert_eq!(summary.bonus_points, 5);
        assert_eq!(summary.total_earned, 20);
        assert_eq!(summary.total_possible, 40);
        assert_eq!(summary.money, 25.0);
        assert_eq!(weekly_money(&data, "olive", date(TODAY)), 25.0);
        assert_eq!(summary.percentage(), 50);
    }

    #[test]
    fn test_level_thresholds() {
        assert_eq!(level(0).level, 1);
        assert_eq!(level(19).title, "Rookie");
        assert_eq!(level(20).title, "Starter");
        assert_eq!(level(2439).level, 24);
        assert_eq!(level(2440).title, "Task God");
        assert_eq!(level(1_000_000).level, 25);
        assert!(LEVELS.windows(2).all(|pair| pair[0].points < pair[1].points));
    }

    #[test]
    fn test_level_progress() {
        assert_eq!(level_progress(0), 0);
        assert_eq!(level_progress(10), 50);
        assert_eq!(level_progress(35), 50);
        assert_eq!(level_progress(2440), 100);
        assert_eq!(level_progress(9999), 100);
    }

    #[test]
    fn test_leaderboard_sorted_by_percentage() {
        let mut data = setup();
        let today = date(TODAY);
        add(&mut data, "olive", "task::o", 10, WeekdaySet::all());
        add(&mut data, "miles", "task::m", 10, WeekdaySet::all());
        // zander has no tasks: nothing possible counts as 100%
        for day in calendar::week_dates(date(MONDAY)).iter().take(3) {
            complete(&mut data, "miles", "task::m", *day);
        }
        complete(&mut data, "olive", "task::o", today);

        let board = leaderboard(&data, today);
        let order: Vec<&str> = board.iter().map(|row| row.child_id.as_str()).collect();
        assert_eq!(order, vec!["zander", "miles", "olive"]);
        assert_eq!(board[0].percentage, 100);
        assert_eq!(board[0].week.money, 0.0);
        assert_eq!(board[1].percentage, 43);
        assert_eq!(board[1].week.max_money, 30.0);
        assert_eq!(board[1].summary.lifetime_points, 30);
        assert_eq!(board[2].name, "Oliver");
    }

    #[test]
    fn test_day_view_marks_active_and_completed() {
        let mut data = setup();
        add(&mut data, "olive", "task::a", 10, WeekdaySet::weekdays());
        add(&mut data, "olive", "task::b", 3, WeekdaySet::from_indices([0, 6]).unwrap());
        complete(&mut data, "olive", "task::a", date(TODAY));

        let view = day_view(&data, "olive", date(TODAY)).unwrap();
        assert_eq!(view.tasks.len(), 2);
        assert!(view.tasks[0].active && view.tasks[0].completed);
        assert!(!view.tasks[1].active && !view.tasks[1].completed);
        assert_eq!(view.points, Points { earned: 10, possible: 10 });
        assert!(view.perfect);
        assert!(day_view(&data, "nobody", date(TODAY)).is_none());
    }
}
