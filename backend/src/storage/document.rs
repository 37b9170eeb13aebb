//! # Stored Document Upgrade
//!
//! Documents written by older versions may lack whole sections, use the
//! original `kids` key for the children map, or carry sync bookkeeping. A
//! document is upgraded by normalising those legacy keys and then deep
//! merging it over the canonical default state:
//!
//! - object over object merges key by key, recursively
//! - anything else (arrays, scalars, null) replaces the default outright
//! - keys only present in the defaults are kept
//!
//! The merged value is then deserialized, which is where per-field upgrades
//! (task `activeDays`, string-keyed ledgers, `weekStart` formats) happen.

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::domain::models::AppData;

/// Sync bookkeeping fields that never belong in the application state
pub const SYNC_TIMESTAMP_FIELDS: [&str; 2] = ["lastUpdated", "_lastUpdated"];

/// Merge `source` over `target`
pub fn deep_merge(target: &mut Value, source: Value) {
    match (target, source) {
        (Value::Object(target_map), Value::Object(source_map)) => {
            for (key, value) in source_map {
                match target_map.get_mut(&key) {
                    Some(existing) => deep_merge(existing, value),
                    None => {
                        target_map.insert(key, value);
                    }
                }
            }
        }
        (target, source) => *target = source,
    }
}

/// Rename legacy top-level keys and strip sync fields
pub fn normalize_legacy(document: &mut Map<String, Value>) {
    if let Some(kids) = document.remove("kids") {
        // A document carrying both keys keeps the newer `children`
        document.entry("children").or_insert(kids);
    }
    for field in SYNC_TIMESTAMP_FIELDS {
        document.remove(field);
    }
}

/// Upgrade a parsed document against `defaults`
pub fn upgrade_value(document: Value, defaults: &AppData) -> Result<AppData> {
    let Value::Object(mut stored) = document else {
        anyhow::bail!("Stored state is not a JSON object");
    };
    normalize_legacy(&mut stored);

    let mut merged = serde_json::to_value(defaults).context("Failed to serialize default state")?;
    deep_merge(&mut merged, Value::Object(stored));

    serde_json::from_value(merged).context("Stored state does not match the expected shape")
}

/// Parse and upgrade a raw stored document
pub fn upgrade(raw: &str, defaults: &AppData) -> Result<AppData> {
    let document: Value = serde_json::from_str(raw).context("Stored state is not valid JSON")?;
    upgrade_value(document, defaults)
}

/// Serialize state for local storage
pub fn to_document(data: &AppData) -> Result<String> {
    serde_json::to_string(data).context("Failed to serialize state")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{BadgeKind, ChildProfile, CompletionKey, WeekdaySet};
    use chrono::NaiveDate;
    use serde_json::json;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn defaults() -> AppData {
        AppData::for_roster(&ChildProfile::default_roster(), date("2026-10-14"))
    }

    #[test]
    fn test_deep_merge_rules() {
        let mut target = json!({"a": {"x": 1, "y": 2}, "list": [1, 2], "keep": true});
        deep_merge(&mut target, json!({"a": {"y": 3, "z": 4}, "list": [9], "new": null}));
        assert_eq!(
            target,
            json!({"a": {"x": 1, "y": 3, "z": 4}, "list": [9], "keep": true, "new": null})
        );
    }

    #[test]
    fn test_missing_badges_default_to_empty() {
        let mut stored = serde_json::to_value(defaults()).unwrap();
        stored["settings"]["allowances"]["olive"] = json!(75);
        stored["completions"] = json!([
            {"childId": "olive", "taskId": "task::1", "date": "2026-10-13", "timestamp": "2026-10-13T09:00:00Z"}
        ]);
        stored.as_object_mut().unwrap().remove("badges");

        let data = upgrade(&stored.to_string(), &defaults()).unwrap();
        assert!(data.badges.is_empty());
        assert_eq!(data.allowance("olive"), 75.0);
        assert_eq!(data.allowance("miles"), 30.0);
        assert!(data
            .completions
            .contains(&CompletionKey::new("olive", "task::1", date("2026-10-13"))));
    }

    #[test]
    fn test_round_trip_is_lossless() {
        let mut original = defaults();
        original.settings.allowances.insert("olive".into(), 12.5);
        let raw = to_document(&original).unwrap();
        assert_eq!(upgrade(&raw, &defaults()).unwrap(), original);
    }

    #[test]
    fn test_legacy_document_is_upgraded() {
        let legacy = json!({
            "kids": {
                "olive": {
                    "name": "Oliver",
                    "avatar": "assets/olive.png",
                    "tasks": [
                        {"id": "task_1700000000000", "name": "Homework", "points": 20, "weekdaysOnly": true},
                        {"id": "task_1700000000001", "name": "Teeth", "points": 5}
                    ]
                }
            },
            "settings": {"allowances": {"olive": 40}, "weekStart": "2024-01-15T00:00:00.000Z"},
            "completions": {
                "olive_task_1700000000000_2024-01-15": {"timestamp": "2024-01-15T17:00:00.000Z"}
            },
            "badges": {
                "olive_perfect_day_2024-01-15": {"awarded": "2024-01-15T17:00:00.000Z", "type": {"id": "perfect_day"}}
            },
            "_lastUpdated": 1705338000000i64
        });

        let data = upgrade_value(legacy, &defaults()).unwrap();
        let olive = data.child("olive").unwrap();
        assert_eq!(olive.tasks[0].active_days, WeekdaySet::weekdays());
        assert_eq!(olive.tasks[1].active_days, WeekdaySet::all());
        // Children absent from the stored map come from the defaults
        assert!(data.child("miles").is_some());
        assert_eq!(data.allowance("olive"), 40.0);
        assert_eq!(data.allowance("zander"), 20.0);
        assert!(data.settings.week_start.is_some());
        assert!(data.completions.contains(&CompletionKey::new(
            "olive",
            "task_1700000000000",
            date("2024-01-15")
        )));
        assert_eq!(data.badges.len(), 1);
        assert!(data
            .badges
            .for_child("olive")
            .all(|(key, _)| key.kind == BadgeKind::PerfectDay));
    }

    #[test]
    fn test_malformed_documents_are_errors() {
        assert!(upgrade("not json", &defaults()).is_err());
        assert!(upgrade("[1, 2, 3]", &defaults()).is_err());
        assert!(upgrade(r#"{"pointAdjustments": "lots"}"#, &defaults()).is_err());
    }
}
