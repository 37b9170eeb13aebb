//! Bounded, newest-first log of manual point adjustments.

use chrono::{Local, NaiveDate};
use log::info;

use crate::domain::models::{AppData, PointAdjustment, MAX_ADJUSTMENTS};

/// Insert at the front and drop whatever falls past the global cap
pub fn add(data: &mut AppData, adjustment: PointAdjustment) {
    info!(
        "Recording {} of {} for child {}: {}",
        adjustment.kind.as_str(),
        adjustment.amount,
        adjustment.child_id,
        adjustment.reason
    );
    data.point_adjustments.insert(0, adjustment);
    data.point_adjustments.truncate(MAX_ADJUSTMENTS);
}

/// Remove an adjustment by id. Returns false when no entry matched.
pub fn delete(data: &mut AppData, adjustment_id: &str) -> bool {
    match data
        .point_adjustments
        .iter()
        .position(|adj| adj.id == adjustment_id)
    {
        Some(index) => {
            let removed = data.point_adjustments.remove(index);
            info!("Deleted adjustment {} for child {}", removed.id, removed.child_id);
            true
        }
        None => false,
    }
}

/// The first `limit` adjustments, newest first, optionally for one child
pub fn list<'a>(data: &'a AppData, child_id: Option<&str>, limit: usize) -> Vec<&'a PointAdjustment> {
    data.point_adjustments
        .iter()
        .filter(|adj| child_id.map_or(true, |id| adj.child_id == id))
        .take(limit)
        .collect()
}

/// Net signed adjustment over the child's whole history
pub fn total_for(data: &AppData, child_id: &str) -> i64 {
    data.point_adjustments
        .iter()
        .filter(|adj| adj.child_id == child_id)
        .map(PointAdjustment::signed_amount)
        .sum()
}

/// Net signed adjustment recorded on or after `week_start` (local date)
pub fn total_since(data: &AppData, child_id: &str, week_start: NaiveDate) -> i64 {
    data.point_adjustments
        .iter()
        .filter(|adj| adj.child_id == child_id)
        .filter(|adj| adj.created_at.with_timezone(&Local).date_naive() >= week_start)
        .map(PointAdjustment::signed_amount)
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{AdjustmentKind, ChildProfile};
    use chrono::{DateTime, Duration, TimeZone, Utc};

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn noon(day: &str) -> DateTime<Utc> {
        let naive = date(day).and_hms_opt(12, 0, 0).unwrap();
        Local.from_local_datetime(&naive).unwrap().with_timezone(&Utc)
    }

    fn adjustment(id: &str, child: &str, amount: u32, kind: AdjustmentKind, at: DateTime<Utc>) -> PointAdjustment {
        PointAdjustment {
            id: id.to_string(),
            child_id: child.to_string(),
            amount,
            reason: "test".to_string(),
            kind,
            created_at: at,
        }
    }

    fn setup() -> AppData {
        AppData::for_roster(&ChildProfile::default_roster(), date("2026-10-14"))
    }

    #[test]
    fn test_add_is_newest_first_and_capped() {
        let mut data = setup();
        let start = noon("2026-10-01");
        for n in 0..(MAX_ADJUSTMENTS + 7) {
            let at = start + Duration::minutes(n as i64);
            add(&mut data, adjustment(&format!("adj::{}", n), "olive", 1, AdjustmentKind::Bonus, at));
            assert!(data.point_adjustments.len() <= MAX_ADJUSTMENTS);
        }

        assert_eq!(data.point_adjustments.len(), MAX_ADJUSTMENTS);
        assert_eq!(data.point_adjustments[0].id, format!("adj::{}", MAX_ADJUSTMENTS + 6));
        // The seven oldest were discarded
        assert!(data.point_adjustments.iter().all(|adj| adj.id != "adj::6"));
        assert!(data.point_adjustments.iter().any(|adj| adj.id == "adj::7"));
    }

    #[test]
    fn test_delete_by_id() {
        let mut data = setup();
        add(&mut data, adjustment("adj::a", "olive", 5, AdjustmentKind::Bonus, Utc::now()));
        add(&mut data, adjustment("adj::b", "miles", 5, AdjustmentKind::Penalty, Utc::now()));

        assert!(delete(&mut data, "adj::a"));
        assert!(!delete(&mut data, "adj::a"));
        assert_eq!(data.point_adjustments.len(), 1);
        assert_eq!(data.point_adjustments[0].id, "adj::b");
    }

    #[test]
    fn test_list_filters_and_limits() {
        let mut data = setup();
        for n in 0..5 {
            add(&mut data, adjustment(&format!("adj::o{}", n), "olive", 1, AdjustmentKind::Bonus, Utc::now()));
            add(&mut data, adjustment(&format!("adj::m{}", n), "miles", 1, AdjustmentKind::Bonus, Utc::now()));
        }

        let olive: Vec<&str> = list(&data, Some("olive"), 3).iter().map(|adj| adj.id.as_str()).collect();
        assert_eq!(olive, vec!["adj::o4", "adj::o3", "adj::o2"]);
        assert_eq!(list(&data, None, 20).len(), 10);
        assert!(list(&data, Some("zander"), 20).is_empty());
    }

    #[test]
    fn test_totals_respect_sign_and_week_start() {
        let mut data = setup();
        add(&mut data, adjustment("adj::1", "olive", 10, AdjustmentKind::Bonus, noon("2026-10-05")));
        add(&mut data, adjustment("adj::2", "olive", 4, AdjustmentKind::Penalty, noon("2026-10-12")));
        add(&mut data, adjustment("adj::3", "olive", 7, AdjustmentKind::Bonus, noon("2026-10-14")));
        add(&mut data, adjustment("adj::4", "miles", 100, AdjustmentKind::Bonus, noon("2026-10-14")));

        assert_eq!(total_for(&data, "olive"), 13);
        assert_eq!(total_since(&data, "olive", date("2026-10-12")), 3);
        assert_eq!(total_since(&data, "olive", date("2026-10-19")), 0);
    }
}
