//! Set of weekdays on which a task counts toward scoring.
//!
//! Days are indexed the way the stored documents index them:
//! 0 = Sunday, 1 = Monday, ..., 6 = Saturday.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};

/// Compact bitset of weekday indices (bit `n` set means day `n` is active)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "Vec<u8>", try_from = "Vec<u8>")]
pub struct WeekdaySet(u8);

const ALL_DAYS_MASK: u8 = 0b0111_1111;

impl WeekdaySet {
    /// Every day of the week
    pub const fn all() -> Self {
        Self(ALL_DAYS_MASK)
    }

    /// No days at all. Only ever produced by callers; the service rejects it.
    pub const fn empty() -> Self {
        Self(0)
    }

    /// Monday through Friday
    pub const fn weekdays() -> Self {
        Self(0b0011_1110)
    }

    /// Build a set from day indices, rejecting anything outside 0..=6
    pub fn from_indices<I: IntoIterator<Item = u8>>(days: I) -> Result<Self, String> {
        let mut mask = 0u8;
        for day in days {
            if day > 6 {
                return Err(format!("Invalid day index: {}. Must be 0-6 (Sunday-Saturday)", day));
            }
            mask |= 1 << day;
        }
        Ok(Self(mask))
    }

    pub fn contains_index(&self, day: u8) -> bool {
        day <= 6 && self.0 & (1 << day) != 0
    }

    pub fn contains(&self, weekday: Weekday) -> bool {
        self.contains_index(weekday.num_days_from_sunday() as u8)
    }

    /// True iff `date` falls on one of the active weekdays
    pub fn includes_date(&self, date: NaiveDate) -> bool {
        self.contains(date.weekday())
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Active day indices in ascending order
    pub fn indices(&self) -> Vec<u8> {
        (0..7).filter(|day| self.contains_index(*day)).collect()
    }
}

impl Default for WeekdaySet {
    fn default() -> Self {
        Self::all()
    }
}

impl From<WeekdaySet> for Vec<u8> {
    fn from(set: WeekdaySet) -> Self {
        set.indices()
    }
}

impl TryFrom<Vec<u8>> for WeekdaySet {
    type Error = String;

    fn try_from(days: Vec<u8>) -> Result<Self, Self::Error> {
        Self::from_indices(days)
    }
}
