//! Calendar-day and calendar-month windows in the condominium's time zone.
//!
//! Visit codes are single-day passes and every dashboard view is bucketed by
//! local calendar day, so all window arithmetic goes through [`Calendar`].
//! The zone is a fixed UTC offset taken from configuration.

use chrono::{DateTime, Datelike, Duration, FixedOffset, NaiveDate, NaiveTime, Utc};

use crate::error::CoreError;
use crate::types::Timestamp;

/// Seconds in one day; the largest offset magnitude chrono accepts is just below this.
const SECONDS_PER_DAY: i32 = 86_400;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Calendar {
    offset: FixedOffset,
}

impl Default for Calendar {
    fn default() -> Self {
        Self::utc()
    }
}

impl Calendar {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    pub fn utc() -> Self {
        Self::new(FixedOffset::east_opt(0).expect("zero offset is valid"))
    }

    /// Build a calendar from an offset east of UTC in minutes (e.g. `-360` for UTC-6).
    pub fn from_offset_minutes(minutes: i32) -> Result<Self, CoreError> {
        let seconds = minutes
            .checked_mul(60)
            .filter(|s| s.abs() < SECONDS_PER_DAY)
            .ok_or_else(|| {
                CoreError::Validation(format!("UTC offset of {minutes} minutes is out of range"))
            })?;
        FixedOffset::east_opt(seconds)
            .map(Self::new)
            .ok_or_else(|| {
                CoreError::Validation(format!("UTC offset of {minutes} minutes is out of range"))
            })
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }

    /// The local calendar date containing `at`.
    pub fn local_date(&self, at: Timestamp) -> NaiveDate {
        at.with_timezone(&self.offset).date_naive()
    }

    /// The UTC instant at which local `date` begins.
    pub fn start_of_day(&self, date: NaiveDate) -> Timestamp {
        let local_midnight = date.and_time(NaiveTime::MIN);
        let utc = local_midnight - Duration::seconds(i64::from(self.offset.local_minus_utc()));
        DateTime::<Utc>::from_naive_utc_and_offset(utc, Utc)
    }

    /// Half-open `[start, end)` UTC window covering local `date`.
    pub fn day_window(&self, date: NaiveDate) -> (Timestamp, Timestamp) {
        (
            self.start_of_day(date),
            self.start_of_day(date + Duration::days(1)),
        )
    }

    /// Every date from `today - days` through `today`, inclusive and ascending.
    pub fn trailing_days(today: NaiveDate, days: u32) -> Vec<NaiveDate> {
        let first = today - Duration::days(i64::from(days));
        first
            .iter_days()
            .take_while(|d| *d <= today)
            .collect()
    }

    /// Half-open date range `[Jan 1 of last year, first day of next month)`
    /// used by the monthly rollup.
    pub fn monthly_window(today: NaiveDate) -> (NaiveDate, NaiveDate) {
        let start = NaiveDate::from_ymd_opt(today.year() - 1, 1, 1)
            .expect("January 1st exists in every year");
        (start, first_of_next_month(today))
    }
}

/// First day of the month after the one containing `date`.
pub fn first_of_next_month(date: NaiveDate) -> NaiveDate {
    let (year, month) = if date.month() == 12 {
        (date.year() + 1, 1)
    } else {
        (date.year(), date.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, month, 1).expect("the first of a month always exists")
}
