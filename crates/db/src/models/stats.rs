//! Row shapes returned by the grouped statistics queries.
//!
//! Each converts into the matching `visitgate_core::stats` input so gap
//! filling and labelling stay in the core crate.

use chrono::NaiveDate;
use sqlx::FromRow;
use visitgate_core::stats::{DayCount, MonthCount, ResidenceCount, RoleStat};

#[derive(Debug, Clone, FromRow)]
pub struct DayCountRow {
    pub date: NaiveDate,
    pub total: i64,
    pub visited: i64,
}

impl From<DayCountRow> for DayCount {
    fn from(row: DayCountRow) -> Self {
        Self {
            date: row.date,
            total: row.total,
            visited: row.visited,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct ResidenceCountRow {
    pub residence: String,
    pub total: i64,
    pub visited: i64,
}

impl From<ResidenceCountRow> for ResidenceCount {
    fn from(row: ResidenceCountRow) -> Self {
        Self {
            residence: row.residence,
            total: row.total,
            visited: row.visited,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct MonthCountRow {
    pub year: i32,
    pub month: i32,
    pub total: i64,
    pub visited: i64,
    pub with_photos: i64,
}

impl From<MonthCountRow> for MonthCount {
    fn from(row: MonthCountRow) -> Self {
        Self {
            year: row.year,
            month: row.month.unsigned_abs(),
            total: row.total,
            visited: row.visited,
            with_photos: row.with_photos,
        }
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct RoleCountRow {
    pub role: String,
    pub count: i64,
}

impl From<RoleCountRow> for RoleStat {
    fn from(row: RoleCountRow) -> Self {
        Self {
            role: row.role,
            count: row.count,
        }
    }
}
