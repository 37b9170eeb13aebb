//! Badge catalog and the ledger of awarded badges.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;

use super::legacy;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BadgeKind {
    #[serde(rename = "perfect_day")]
    PerfectDay,
    #[serde(rename = "streak_3")]
    Streak3,
    #[serde(rename = "streak_7")]
    Streak7,
    #[serde(rename = "point_collector")]
    PointCollector,
}

impl BadgeKind {
    /// Catalog order, used for display
    pub const ALL: [BadgeKind; 4] = [
        BadgeKind::PerfectDay,
        BadgeKind::Streak3,
        BadgeKind::Streak7,
        BadgeKind::PointCollector,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            BadgeKind::PerfectDay => "perfect_day",
            BadgeKind::Streak3 => "streak_3",
            BadgeKind::Streak7 => "streak_7",
            BadgeKind::PointCollector => "point_collector",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.id() == id)
    }

    pub fn name(&self) -> &'static str {
        match self {
            BadgeKind::PerfectDay => "Perfect Day",
            BadgeKind::Streak3 => "3-Day Streak",
            BadgeKind::Streak7 => "Week Warrior",
            BadgeKind::PointCollector => "Point Collector",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            BadgeKind::PerfectDay => "⭐",
            BadgeKind::Streak3 => "🔥",
            BadgeKind::Streak7 => "🏆",
            BadgeKind::PointCollector => "💎",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            BadgeKind::PerfectDay => "Completed all tasks in a day",
            BadgeKind::Streak3 => "3 perfect days in a row",
            BadgeKind::Streak7 => "7 perfect days in a row",
            BadgeKind::PointCollector => "Earned 100 lifetime points",
        }
    }

    /// Day-scoped badges are keyed by the qualifying date; one-shot badges are not
    pub fn is_day_scoped(&self) -> bool {
        !matches!(self, BadgeKind::PointCollector)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BadgeKey {
    pub child_id: String,
    pub kind: BadgeKind,
    pub date: Option<NaiveDate>,
}

impl BadgeKey {
    pub fn dated(child_id: &str, kind: BadgeKind, date: NaiveDate) -> Self {
        Self {
            child_id: child_id.to_string(),
            kind,
            date: Some(date),
        }
    }

    pub fn one_shot(child_id: &str, kind: BadgeKind) -> Self {
        Self {
            child_id: child_id.to_string(),
            kind,
            date: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct BadgeRecord {
    pub awarded_at: DateTime<Utc>,
    /// Length of the streak that earned a streak badge
    pub streak: Option<u32>,
}

/// Number of times a child has earned one kind of badge
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeCount {
    pub kind: BadgeKind,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BadgeEntry {
    pub child_id: String,
    #[serde(rename = "type")]
    pub kind: BadgeKind,
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub awarded_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub streak: Option<u32>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BadgeLedger {
    records: BTreeMap<BadgeKey, BadgeRecord>,
}

impl BadgeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &BadgeKey) -> bool {
        self.records.contains_key(key)
    }

    pub fn get(&self, key: &BadgeKey) -> Option<&BadgeRecord> {
        self.records.get(key)
    }

    /// Create or overwrite a badge record
    pub fn award(&mut self, key: BadgeKey, record: BadgeRecord) {
        self.records.insert(key, record);
    }

    pub fn revoke(&mut self, key: &BadgeKey) -> bool {
        self.records.remove(key).is_some()
    }

    pub fn for_child<'a>(&'a self, child_id: &'a str) -> impl Iterator<Item = (&'a BadgeKey, &'a BadgeRecord)> + 'a {
        self.records.iter().filter(move |(key, _)| key.child_id == child_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Serialize for BadgeLedger {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let entries: Vec<BadgeEntry> = self
            .records
            .iter()
            .map(|(key, record)| BadgeEntry {
                child_id: key.child_id.clone(),
                kind: key.kind,
                date: key.date,
                awarded_at: record.awarded_at,
                streak: record.streak,
            })
            .collect();
        entries.serialize(serializer)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredBadges {
    Entries(Vec<BadgeEntry>),
    Legacy(BTreeMap<String, serde_json::Value>),
}

impl<'de> Deserialize<'de> for BadgeLedger {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut ledger = BadgeLedger::new();
        match StoredBadges::deserialize(deserializer)? {
            StoredBadges::Entries(entries) => {
                for entry in entries {
                    ledger.award(
                        BadgeKey {
                            child_id: entry.child_id,
                            kind: entry.kind,
                            date: entry.date,
                        },
                        BadgeRecord {
                            awarded_at: entry.awarded_at,
                            streak: entry.streak,
                        },
                    );
                }
            }
            StoredBadges::Legacy(map) => {
                for (raw_key, value) in map {
                    if value.is_null() {
                        continue;
                    }
                    let Some((child_id, kind_id, date)) = legacy::split_composite_key(&raw_key) else {
                        log::warn!("Skipping unparseable legacy badge key '{}'", raw_key);
                        continue;
                    };
                    let kind = value
                        .pointer("/type/id")
                        .and_then(|v| v.as_str())
                        .and_then(BadgeKind::from_id)
                        .or_else(|| BadgeKind::from_id(kind_id));
                    let Some(kind) = kind else {
                        log::warn!("Skipping legacy badge with unknown type '{}'", raw_key);
                        continue;
                    };
                    let key = BadgeKey {
                        child_id: child_id.to_string(),
                        kind,
                        date: if kind.is_day_scoped() { date } else { None },
                    };
                    let record = BadgeRecord {
                        awarded_at: legacy::timestamp_field(&value, "awarded").unwrap_or_default(),
                        streak: value.get("streak").and_then(|v| v.as_u64()).map(|s| s as u32),
                    };
                    ledger.award(key, record);
                }
            }
        }
        Ok(ledger)
    }
}
