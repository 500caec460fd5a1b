//! Dashboard statistics shapes and the post-processing applied to grouped
//! query results.
//!
//! The database returns only buckets that have activity. The functions here
//! turn those sparse rows into the views the dashboard expects: a gap-free
//! day series, labelled months, and derived `pending` counts.

use std::collections::HashMap;

use chrono::NaiveDate;
use serde::Serialize;

/// Default trailing window for [`DayStat`] series.
pub const DEFAULT_DAYS: u32 = 30;
/// Upper bound on the trailing window.
pub const MAX_DAYS: u32 = 366;
/// Default number of residences in the ranking.
pub const DEFAULT_RESIDENCE_LIMIT: i64 = 10;
/// Upper bound on the residence ranking size.
pub const MAX_RESIDENCE_LIMIT: i64 = 100;

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

// ---------------------------------------------------------------------------
// Views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneralStats {
    pub total_users: i64,
    pub total_visitors: i64,
    pub visitors_today: i64,
    pub visited_today: i64,
    pub pending_today: i64,
}

impl GeneralStats {
    pub fn new(
        total_users: i64,
        total_visitors: i64,
        visitors_today: i64,
        visited_today: i64,
    ) -> Self {
        Self {
            total_users,
            total_visitors,
            visitors_today,
            visited_today,
            pending_today: visitors_today - visited_today,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayStat {
    pub date: NaiveDate,
    pub total: i64,
    pub visited: i64,
    pub pending: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResidenceStat {
    pub residence: String,
    pub total: i64,
    pub visited: i64,
    pub pending: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthStat {
    pub year: i32,
    pub month: u32,
    /// Display label, e.g. `"Mar 2026"`.
    pub period: String,
    pub total: i64,
    pub visited: i64,
    pub with_photos: i64,
    pub pending: i64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RoleStat {
    pub role: String,
    pub count: i64,
}

// ---------------------------------------------------------------------------
// Grouped inputs (one per active bucket)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DayCount {
    pub date: NaiveDate,
    pub total: i64,
    pub visited: i64,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResidenceCount {
    pub residence: String,
    pub total: i64,
    pub visited: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MonthCount {
    pub year: i32,
    pub month: u32,
    pub total: i64,
    pub visited: i64,
    pub with_photos: i64,
}

// ---------------------------------------------------------------------------
// Shaping
// ---------------------------------------------------------------------------

/// Produce exactly one [`DayStat`] per entry of `days`, in the given order,
/// defaulting days absent from `counts` to zero.
pub fn fill_day_series(days: &[NaiveDate], counts: &[DayCount]) -> Vec<DayStat> {
    let by_date: HashMap<NaiveDate, &DayCount> = counts.iter().map(|c| (c.date, c)).collect();

    days.iter()
        .map(|&date| {
            let (total, visited) = by_date
                .get(&date)
                .map(|c| (c.total, c.visited))
                .unwrap_or((0, 0));
            DayStat {
                date,
                total,
                visited,
                pending: total - visited,
            }
        })
        .collect()
}

/// Attach `pending` to ranked residence rows. Order is preserved.
pub fn residence_stats(counts: Vec<ResidenceCount>) -> Vec<ResidenceStat> {
    counts
        .into_iter()
        .map(|c| ResidenceStat {
            pending: c.total - c.visited,
            residence: c.residence,
            total: c.total,
            visited: c.visited,
        })
        .collect()
}

/// Label and sort month rows chronologically. Months with no visits are
/// not synthesized.
pub fn month_stats(mut counts: Vec<MonthCount>) -> Vec<MonthStat> {
    counts.sort_by_key(|c| (c.year, c.month));
    counts
        .into_iter()
        .map(|c| MonthStat {
            year: c.year,
            month: c.month,
            period: month_label(c.year, c.month),
            total: c.total,
            visited: c.visited,
            with_photos: c.with_photos,
            pending: c.total - c.visited,
        })
        .collect()
}

/// `"Mar 2026"` style label. Out-of-range months fall back to the number.
pub fn month_label(year: i32, month: u32) -> String {
    match month
        .checked_sub(1)
        .and_then(|i| MONTH_ABBREVIATIONS.get(i as usize))
    {
        Some(name) => format!("{name} {year}"),
        None => format!("{month:02} {year}"),
    }
}

/// Clamp a requested trailing-day window to `0..=MAX_DAYS`, defaulting when absent.
pub fn clamp_days(days: Option<i64>) -> u32 {
    match days {
        None => DEFAULT_DAYS,
        Some(d) => d.clamp(0, i64::from(MAX_DAYS)) as u32,
    }
}

/// Clamp a requested ranking size to `1..=MAX_RESIDENCE_LIMIT`, defaulting when absent.
pub fn clamp_residence_limit(limit: Option<i64>) -> i64 {
    limit
        .unwrap_or(DEFAULT_RESIDENCE_LIMIT)
        .clamp(1, MAX_RESIDENCE_LIMIT)
}
