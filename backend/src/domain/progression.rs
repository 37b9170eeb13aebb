//! Perfect days, streaks and badge awards.
//!
//! Two streak walks exist and they differ on purpose:
//!
//! - [`current_streak`] is what the leaderboard shows. It starts at today but
//!   does not let an unfinished today break the streak.
//! - [`streak_ending_on`] is what badge awards use. It counts perfect days
//!   ending at the toggled date and stops at the first imperfect one.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use log::{debug, info};

use crate::domain::completion_ledger::is_completed;
use crate::domain::models::{AppData, BadgeCount, BadgeKey, BadgeKind, BadgeRecord};
use crate::domain::scoring;

/// How far back the leaderboard streak is walked
pub const CURRENT_STREAK_LOOKBACK_DAYS: i64 = 365;
/// How far back a streak badge evaluation is walked
pub const STREAK_BADGE_LOOKBACK_DAYS: i64 = 30;
/// Lifetime points needed for the Point Collector badge
pub const POINT_COLLECTOR_THRESHOLD: u32 = 100;

/// At least one task is active on `date` and every active task is completed
pub fn is_perfect_day(data: &AppData, child_id: &str, date: NaiveDate) -> bool {
    let Some(child) = data.child(child_id) else {
        return false;
    };

    let mut active = child.tasks.iter().filter(|task| task.is_active_on(date)).peekable();
    if active.peek().is_none() {
        return false;
    }
    active.all(|task| is_completed(data, child_id, &task.id, date))
}

/// Consecutive perfect days up to today. An imperfect today is skipped, not
/// counted as a break.
pub fn current_streak(data: &AppData, child_id: &str, today: NaiveDate) -> u32 {
    let mut streak = 0;
    for back in 0..CURRENT_STREAK_LOOKBACK_DAYS {
        let perfect = is_perfect_day(data, child_id, today - Duration::days(back));
        if perfect {
            streak += 1;
        } else if back > 0 {
            break;
        }
    }
    streak
}

/// Consecutive perfect days ending at and including `date`
pub fn streak_ending_on(data: &AppData, child_id: &str, date: NaiveDate) -> u32 {
    (0..STREAK_BADGE_LOOKBACK_DAYS)
        .map(|back| date - Duration::days(back))
        .take_while(|day| is_perfect_day(data, child_id, *day))
        .count() as u32
}

/// Bring the child's badges up to date after a change on `date`.
///
/// The Perfect Day badge mirrors the day's current state and is revoked when
/// the day stops being perfect. Streak and Point Collector badges are only
/// ever added.
pub fn evaluate_badges(data: &mut AppData, child_id: &str, date: NaiveDate, now: DateTime<Utc>) {
    let has_tasks = data
        .child(child_id)
        .is_some_and(|child| !child.tasks.is_empty());
    if !has_tasks {
        return;
    }

    let perfect_key = BadgeKey::dated(child_id, BadgeKind::PerfectDay, date);
    if is_perfect_day(data, child_id, date) {
        debug!("{} had a perfect day on {}", child_id, date);
        data.badges.award(
            perfect_key,
            BadgeRecord {
                awarded_at: now,
                streak: None,
            },
        );
    } else if data.badges.revoke(&perfect_key) {
        debug!("Revoked perfect day badge for {} on {}", child_id, date);
    }

    let collector_key = BadgeKey::one_shot(child_id, BadgeKind::PointCollector);
    if !data.badges.contains(&collector_key)
        && scoring::lifetime_points(data, child_id) >= POINT_COLLECTOR_THRESHOLD
    {
        info!("{} earned the {} badge", child_id, BadgeKind::PointCollector.name());
        data.badges.award(
            collector_key,
            BadgeRecord {
                awarded_at: now,
                streak: None,
            },
        );
    }

    let streak = streak_ending_on(data, child_id, date);
    for (kind, needed) in [(BadgeKind::Streak3, 3), (BadgeKind::Streak7, 7)] {
        if streak >= needed {
            info!("{} earned {} on {} (streak {})", child_id, kind.name(), date, streak);
            data.badges.award(
                BadgeKey::dated(child_id, kind, date),
                BadgeRecord {
                    awarded_at: now,
                    streak: Some(streak),
                },
            );
        }
    }
}

/// Badge counts per kind in catalog order, omitting kinds never earned
pub fn kid_badges(data: &AppData, child_id: &str) -> Vec<BadgeCount> {
    BadgeKind::ALL
        .into_iter()
        .map(|kind| BadgeCount {
            kind,
            count: data
                .badges
                .for_child(child_id)
                .filter(|(key, _)| key.kind == kind)
                .count(),
        })
        .filter(|badge| badge.count > 0)
        .collect()
}
