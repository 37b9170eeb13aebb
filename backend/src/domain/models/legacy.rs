//! Parsing helpers for documents written by earlier versions of the tracker,
//! which keyed completions and badges by `"{child}_{middle}_{YYYY-MM-DD}"`
//! strings and stored the week start as a full timestamp.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Deserializer};

/// Split a legacy composite key into `(child_id, middle, date)`.
///
/// The child id is everything before the first `_`. The date is the trailing
/// `_YYYY-MM-DD` segment when present. Returns `None` when nothing is left for
/// the middle part.
pub(crate) fn split_composite_key(key: &str) -> Option<(&str, &str, Option<NaiveDate>)> {
    let (child_id, rest) = key.split_once('_')?;
    if child_id.is_empty() {
        return None;
    }

    if let Some((middle, tail)) = rest.rsplit_once('_') {
        if let Ok(date) = NaiveDate::parse_from_str(tail, "%Y-%m-%d") {
            if middle.is_empty() {
                return None;
            }
            return Some((child_id, middle, Some(date)));
        }
    }

    if rest.is_empty() {
        None
    } else {
        Some((child_id, rest, None))
    }
}

/// Read an RFC 3339 timestamp out of a legacy record value, if it carries one
pub(crate) fn timestamp_field(value: &serde_json::Value, field: &str) -> Option<DateTime<chrono::Utc>> {
    value
        .get(field)
        .and_then(|v| v.as_str())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&chrono::Utc))
}

/// Parse a week-start value written either as `YYYY-MM-DD` or as the RFC 3339
/// timestamp of local midnight
pub(crate) fn parse_week_start(raw: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return Some(date);
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.with_timezone(&Local).date_naive())
}

/// Serde adapter for `Settings::week_start`
pub(crate) fn deserialize_week_start<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => parse_week_start(&s)
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid week start: {}", s))),
    }
}
