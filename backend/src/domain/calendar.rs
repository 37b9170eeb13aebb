//! Calendar arithmetic for the chore tracker.
//!
//! Everything here works on local calendar dates (`NaiveDate`), never on UTC
//! instants, so a completion recorded just before midnight lands on the day
//! the family saw on the wall.

use chrono::{Datelike, Duration, NaiveDate};

/// Canonical `YYYY-MM-DD` form used for keys and the REST surface
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The Monday of the week containing `date`
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Duration::days(date.weekday().num_days_from_monday() as i64)
}

/// ISO-8601 week number: shift to the Thursday of the same week, then count
/// weeks from January 1st of that Thursday's year
pub fn week_number(date: NaiveDate) -> u32 {
    let iso_weekday = date.weekday().number_from_monday() as i64;
    let thursday = date + Duration::days(4 - iso_weekday);
    let year_start = thursday.with_ordinal(1).unwrap_or(thursday);
    let days_since = (thursday - year_start).num_days() + 1;
    ((days_since + 6) / 7) as u32
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

/// Seven consecutive dates starting at `start`
pub fn week_dates(start: NaiveDate) -> [NaiveDate; 7] {
    std::array::from_fn(|offset| start + Duration::days(offset as i64))
}

/// `n` consecutive dates ending at and including `today`, oldest first
pub fn last_n_days(today: NaiveDate, n: usize) -> Vec<NaiveDate> {
    (0..n)
        .rev()
        .map(|back| today - Duration::days(back as i64))
        .collect()
}

/// Day index in stored form: 0 = Sunday ... 6 = Saturday
pub fn day_index(date: NaiveDate) -> u8 {
    date.weekday().num_days_from_sunday() as u8
}

/// Short display name for a stored day index
pub fn day_name(day: u8) -> &'static str {
    match day {
        0 => "Sunday",
        1 => "Monday",
        2 => "Tuesday",
        3 => "Wednesday",
        4 => "Thursday",
        5 => "Friday",
        6 => "Saturday",
        _ => "Invalid",
    }
}
