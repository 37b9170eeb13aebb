//! Source of "now" for the domain layer.
//!
//! Scores depend on what today is (future days earn nothing, streaks are
//! measured back from today), so the service reads time through this trait
//! and tests pin it with [`FixedClock`].

use chrono::{DateTime, Duration, Local, NaiveDate, NaiveTime, TimeZone, Utc};
use std::sync::{Mutex, PoisonError};

pub trait Clock: Send + Sync {
    /// Current local date-time
    fn now(&self) -> DateTime<Local>;

    /// Current local calendar date
    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }

    fn now_utc(&self) -> DateTime<Utc> {
        self.now().with_timezone(&Utc)
    }

    fn epoch_millis(&self) -> i64 {
        self.now().timestamp_millis()
    }
}

/// Wall-clock time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// A clock that only moves when told to
#[derive(Debug)]
pub struct FixedClock {
    now: Mutex<DateTime<Local>>,
}

impl FixedClock {
    pub fn new(now: DateTime<Local>) -> Self {
        Self { now: Mutex::new(now) }
    }

    /// Noon local time on `date`
    pub fn on(date: NaiveDate) -> Self {
        Self::new(local_noon(date))
    }

    pub fn set(&self, now: DateTime<Local>) {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner) = now;
    }

    pub fn set_date(&self, date: NaiveDate) {
        self.set(local_noon(date));
    }

    pub fn advance(&self, by: Duration) {
        let mut now = self.now.lock().unwrap_or_else(PoisonError::into_inner);
        *now += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        *self.now.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn local_noon(date: NaiveDate) -> DateTime<Local> {
    let noon = date.and_time(NaiveTime::MIN) + Duration::hours(12);
    Local
        .from_local_datetime(&noon)
        .earliest()
        .unwrap_or_else(|| Local.from_utc_datetime(&noon))
}
