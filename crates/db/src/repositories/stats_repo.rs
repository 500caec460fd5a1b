//! Aggregate queries backing the statistics dashboard.
//!
//! Every query here is a single read-only statement. Grouped queries return
//! only buckets with activity; shaping happens in `visitgate_core::stats`.

use chrono::NaiveDate;
use sqlx::PgPool;
use visitgate_core::types::Timestamp;

use crate::models::stats::{DayCountRow, MonthCountRow, ResidenceCountRow, RoleCountRow};

pub struct StatsRepo;

impl StatsRepo {
    pub async fn count_users(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(pool)
            .await
    }

    pub async fn count_visitors(pool: &PgPool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM visitors")
            .fetch_one(pool)
            .await
    }

    /// Visits scheduled on `date`.
    pub async fn count_scheduled_on(pool: &PgPool, date: NaiveDate) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar("SELECT COUNT(*) FROM visitors WHERE visit_date = $1")
            .bind(date)
            .fetch_one(pool)
            .await
    }

    /// Visits completed within `[start, end)`, regardless of scheduled date.
    pub async fn count_visited_between(
        pool: &PgPool,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM visitors WHERE visited_at >= $1 AND visited_at < $2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(pool)
        .await
    }

    /// Per-day totals for visits scheduled in `[first, last]`, ascending.
    pub async fn visits_by_day(
        pool: &PgPool,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Result<Vec<DayCountRow>, sqlx::Error> {
        sqlx::query_as::<_, DayCountRow>(
            "SELECT visit_date AS date,
                    COUNT(*) AS total,
                    COUNT(visited_at) AS visited
             FROM visitors
             WHERE visit_date >= $1 AND visit_date <= $2
             GROUP BY visit_date
             ORDER BY visit_date",
        )
        .bind(first)
        .bind(last)
        .fetch_all(pool)
        .await
    }

    /// Residences ranked by visit count, descending, ties by residence number.
    ///
    /// Visits without a resident are excluded by the inner join.
    pub async fn visits_by_residence(
        pool: &PgPool,
        limit: i64,
    ) -> Result<Vec<ResidenceCountRow>, sqlx::Error> {
        sqlx::query_as::<_, ResidenceCountRow>(
            "SELECT u.residence_number AS residence,
                    COUNT(*) AS total,
                    COUNT(v.visited_at) AS visited
             FROM visitors v
             JOIN users u ON u.id = v.resident_id
             GROUP BY u.residence_number
             ORDER BY total DESC, residence ASC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Per-month totals for visits scheduled in `[start, end)`.
    pub async fn visits_by_month(
        pool: &PgPool,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<MonthCountRow>, sqlx::Error> {
        sqlx::query_as::<_, MonthCountRow>(
            "SELECT EXTRACT(YEAR FROM visit_date)::INT AS year,
                    EXTRACT(MONTH FROM visit_date)::INT AS month,
                    COUNT(*) AS total,
                    COUNT(visited_at) AS visited,
                    COUNT(*) FILTER (WHERE photos_uploaded) AS with_photos
             FROM visitors
             WHERE visit_date >= $1 AND visit_date < $2
             GROUP BY 1, 2
             ORDER BY 1, 2",
        )
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await
    }

    /// User counts for each role that has at least one account.
    pub async fn users_by_role(pool: &PgPool) -> Result<Vec<RoleCountRow>, sqlx::Error> {
        sqlx::query_as::<_, RoleCountRow>(
            "SELECT role, COUNT(*) AS count FROM users GROUP BY role ORDER BY role",
        )
        .fetch_all(pool)
        .await
    }
}
