//! Completion facts: "child C completed task T on calendar date D".
//!
//! Presence of a key means completed, absence means not completed. Keys are
//! structured so ids containing separators can never collide.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use super::legacy;

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CompletionKey {
    pub child_id: String,
    pub task_id: String,
    pub date: NaiveDate,
}

impl CompletionKey {
    pub fn new(child_id: &str, task_id: &str, date: NaiveDate) -> Self {
        Self {
            child_id: child_id.to_string(),
            task_id: task_id.to_string(),
            date,
        }
    }
}

/// Serialized form of a single completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionEntry {
    pub child_id: String,
    pub task_id: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub timestamp: DateTime<Utc>,
}

/// The set of all completion facts, keyed by (child, task, date)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CompletionLedger {
    records: BTreeMap<CompletionKey, DateTime<Utc>>,
}

impl CompletionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &CompletionKey) -> bool {
        self.records.contains_key(key)
    }

    pub fn recorded_at(&self, key: &CompletionKey) -> Option<DateTime<Utc>> {
        self.records.get(key).copied()
    }

    pub fn insert(&mut self, key: CompletionKey, recorded_at: DateTime<Utc>) {
        self.records.insert(key, recorded_at);
    }

    pub fn remove(&mut self, key: &CompletionKey) -> bool {
        self.records.remove(key).is_some()
    }

    /// Flip presence of `key`, returning the new completed state
    pub fn toggle(&mut self, key: CompletionKey, now: DateTime<Utc>) -> bool {
        if self.records.remove(&key).is_some() {
            false
        } else {
            self.records.insert(key, now);
            true
        }
    }

    /// Remove every record referencing `task_id`, regardless of child or date.
    /// Returns how many records were removed.
    pub fn remove_task(&mut self, task_id: &str) -> usize {
        let before = self.records.len();
        self.records.retain(|key, _| key.task_id != task_id);
        before - self.records.len()
    }

    pub fn for_child<'a>(&'a self, child_id: &'a str) -> impl Iterator<Item = &'a CompletionKey> + 'a {
        self.records.keys().filter(move |key| key.child_id == child_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&CompletionKey, &DateTime<Utc>)> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Serialize for CompletionLedger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries: Vec<CompletionEntry> = self
            .records
            .iter()
            .map(|(key, timestamp)| CompletionEntry {
                child_id: key.child_id.clone(),
                task_id: key.task_id.clone(),
                date: key.date,
                timestamp: *timestamp,
            })
            .collect();
        entries.serialize(serializer)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredCompletions {
    Entries(Vec<CompletionEntry>),
    Legacy(BTreeMap<String, serde_json::Value>),
}

impl<'de> Deserialize<'de> for CompletionLedger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut ledger = CompletionLedger::new();
        match StoredCompletions::deserialize(deserializer)? {
            StoredCompletions::Entries(entries) => {
                for entry in entries {
                    ledger.insert(
                        CompletionKey {
                            child_id: entry.child_id,
                            task_id: entry.task_id,
                            date: entry.date,
                        },
                        entry.timestamp,
                    );
                }
            }
            StoredCompletions::Legacy(map) => {
                for (raw_key, value) in map {
                    // Legacy documents stored `false`/`null` for cleared entries
                    if value.is_null() || value == serde_json::Value::Bool(false) {
                        continue;
                    }
                    let Some((child_id, task_id, Some(date))) = legacy::split_composite_key(&raw_key) else {
                        log::warn!("Skipping unparseable legacy completion key '{}'", raw_key);
                        continue;
                    };
                    let timestamp = legacy::timestamp_field(&value, "timestamp").unwrap_or_default();
                    ledger.insert(CompletionKey::new(child_id, task_id, date), timestamp);
                }
            }
        }
        Ok(ledger)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_toggle_twice_restores_ledger() {
        let mut ledger = CompletionLedger::new();
        let key = CompletionKey::new("olive", "task::1", date("2024-01-17"));
        let original = ledger.clone();

        assert!(ledger.toggle(key.clone(), Utc::now()));
        assert!(ledger.contains(&key));
        assert!(!ledger.toggle(key.clone(), Utc::now()));
        assert_eq!(ledger, original);
    }

    #[test]
    fn test_remove_task_only_touches_that_task() {
        let mut ledger = CompletionLedger::new();
        let now = Utc::now();
        ledger.insert(CompletionKey::new("olive", "task::a", date("2024-01-01")), now);
        ledger.insert(CompletionKey::new("miles", "task::a", date("2024-01-02")), now);
        ledger.insert(CompletionKey::new("olive", "task::b", date("2024-01-01")), now);

        assert_eq!(ledger.remove_task("task::a"), 2);
        assert_eq!(ledger.len(), 1);
        assert!(ledger.contains(&CompletionKey::new("olive", "task::b", date("2024-01-01"))));
    }

    #[test]
    fn test_serializes_as_entry_list() {
        let mut ledger = CompletionLedger::new();
        let key = CompletionKey::new("olive", "task::a", date("2024-01-01"));
        ledger.insert(key.clone(), DateTime::<Utc>::default());

        let value = serde_json::to_value(&ledger).unwrap();
        assert_eq!(value[0]["childId"], "olive");
        assert_eq!(value[0]["taskId"], "task::a");
        assert_eq!(value[0]["date"], "2024-01-01");

        let back: CompletionLedger = serde_json::from_value(value).unwrap();
        assert!(back.contains(&key));
    }

    #[test]
    fn test_reads_legacy_string_keyed_map() {
        let legacy = serde_json::json!({
            "olive_task_1700000000000_2024-01-15": { "timestamp": "2024-01-15T08:30:00.000Z" },
            "miles_task_1700000000001_2024-01-16": true,
            "zander_task_1_2024-01-16": false,
            "garbage": true
        });
        let ledger: CompletionLedger = serde_json::from_value(legacy).unwrap();

        assert_eq!(ledger.len(), 2);
        let olive = CompletionKey::new("olive", "task_1700000000000", date("2024-01-15"));
        assert!(ledger.contains(&olive));
        assert_eq!(
            ledger.recorded_at(&olive).unwrap().to_rfc3339(),
            "2024-01-15T08:30:00+00:00"
        );
        assert!(ledger.contains(&CompletionKey::new("miles", "task_1700000000001", date("2024-01-16"))));
    }
}
