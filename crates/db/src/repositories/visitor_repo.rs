//! Repository for the `visitors` table.
//!
//! Read paths that need the host's residence go through [`PROJECTION`]
//! with a LEFT JOIN, so visits whose resident was deleted still appear.

use chrono::NaiveDate;
use sqlx::PgPool;
use visitgate_core::types::{DbId, Timestamp};

use crate::models::visitor::{
    CreateVisitor, VisitProjection, Visitor, VisitorDetails, VisitorFilter,
};

/// Column list for full `visitors` rows.
const COLUMNS: &str = "id, visit_code, visitor_name, visitor_phone, visit_date, visit_time, \
                       visit_reason, resident_id, visited_at, photos, photos_uploaded, \
                       created_at, updated_at";

/// Columns of [`VisitProjection`], selected from `visitors v LEFT JOIN users u`.
const PROJECTION: &str = "v.id, v.visit_code, v.visitor_name, v.visitor_phone, v.visit_reason, \
                          v.visit_date, v.visit_time, u.residence_number AS residence, \
                          v.visited_at, v.photos_uploaded, v.created_at";

/// Extra columns of [`VisitorDetails`] on top of [`PROJECTION`].
const DETAIL_EXTRA: &str = "u.email AS host_email, u.phone AS host_phone, v.photos";

const JOIN: &str = "visitors v LEFT JOIN users u ON u.id = v.resident_id";

const DEFAULT_LIST_LIMIT: i64 = 100;
const MAX_LIST_LIMIT: i64 = 500;

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT)
}

fn clamp_offset(offset: Option<i64>) -> i64 {
    offset.unwrap_or(0).max(0)
}

/// Provides persistence for visitor registrations and gate events.
pub struct VisitorRepo;

impl VisitorRepo {
    /// Insert a visitor, returning the created row.
    ///
    /// A colliding `visit_code` fails with a unique violation on
    /// `uq_visitors_visit_code`; callers retry with a fresh code.
    pub async fn create(pool: &PgPool, input: &CreateVisitor) -> Result<Visitor, sqlx::Error> {
        let query = format!(
            "INSERT INTO visitors
                (visit_code, visitor_name, visitor_phone, visit_date, visit_time,
                 visit_reason, resident_id)
             VALUES ($1, $2, $3, $4, $5, $6, $7)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Visitor>(&query)
            .bind(&input.visit_code)
            .bind(&input.visitor_name)
            .bind(&input.visitor_phone)
            .bind(input.visit_date)
            .bind(&input.visit_time)
            .bind(&input.visit_reason)
            .bind(input.resident_id)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Visitor>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM visitors WHERE id = $1");
        sqlx::query_as::<_, Visitor>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_projection(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<VisitProjection>, sqlx::Error> {
        let query = format!("SELECT {PROJECTION} FROM {JOIN} WHERE v.id = $1");
        sqlx::query_as::<_, VisitProjection>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_details(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<VisitorDetails>, sqlx::Error> {
        let query = format!("SELECT {PROJECTION}, {DETAIL_EXTRA} FROM {JOIN} WHERE v.id = $1");
        sqlx::query_as::<_, VisitorDetails>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find the visit with exactly this code scheduled on `date`.
    pub async fn find_by_code_on(
        pool: &PgPool,
        code: &str,
        date: NaiveDate,
    ) -> Result<Option<VisitProjection>, sqlx::Error> {
        let query = format!(
            "SELECT {PROJECTION} FROM {JOIN}
             WHERE v.visit_code = $1 AND v.visit_date = $2"
        );
        sqlx::query_as::<_, VisitProjection>(&query)
            .bind(code)
            .bind(date)
            .fetch_optional(pool)
            .await
    }

    /// Record the visit as completed at `at` unless it already is.
    ///
    /// Only a pending row is written, so the first recorded timestamp wins and
    /// a repeat call leaves the row (and its `updated_at`) untouched. `None` if
    /// the visit does not exist.
    pub async fn mark_visited(
        pool: &PgPool,
        id: DbId,
        at: Timestamp,
    ) -> Result<Option<VisitProjection>, sqlx::Error> {
        let query = format!(
            "WITH v AS (
                UPDATE visitors SET visited_at = $2
                WHERE id = $1 AND visited_at IS NULL
                RETURNING *
             )
             SELECT {PROJECTION} FROM v LEFT JOIN users u ON u.id = v.resident_id"
        );
        let updated = sqlx::query_as::<_, VisitProjection>(&query)
            .bind(id)
            .bind(at)
            .fetch_optional(pool)
            .await?;

        match updated {
            Some(visit) => Ok(Some(visit)),
            // Already visited, or missing. A fresh read sees the committed timestamp.
            None => Self::find_projection(pool, id).await,
        }
    }

    /// Visits scheduled in `[start, end)`, newest-created first.
    pub async fn list_for_window(
        pool: &PgPool,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<VisitProjection>, sqlx::Error> {
        let query = format!(
            "SELECT {PROJECTION} FROM {JOIN}
             WHERE v.visit_date >= $1 AND v.visit_date < $2
             ORDER BY v.created_at DESC, v.id DESC"
        );
        sqlx::query_as::<_, VisitProjection>(&query)
            .bind(start)
            .bind(end)
            .fetch_all(pool)
            .await
    }

    /// Visitors registered by one resident, newest-created first.
    pub async fn list_for_resident(
        pool: &PgPool,
        resident_id: DbId,
    ) -> Result<Vec<VisitProjection>, sqlx::Error> {
        let query = format!(
            "SELECT {PROJECTION} FROM {JOIN}
             WHERE v.resident_id = $1
             ORDER BY v.created_at DESC, v.id DESC"
        );
        sqlx::query_as::<_, VisitProjection>(&query)
            .bind(resident_id)
            .fetch_all(pool)
            .await
    }

    /// Admin listing. Absent filters match everything.
    pub async fn search(
        pool: &PgPool,
        filter: &VisitorFilter,
        limit: Option<i64>,
        offset: Option<i64>,
    ) -> Result<Vec<VisitorDetails>, sqlx::Error> {
        let query = format!(
            "SELECT {PROJECTION}, {DETAIL_EXTRA} FROM {JOIN}
             WHERE ($1::TEXT IS NULL
                    OR v.visitor_name ILIKE $1
                    OR v.visit_code ILIKE $1
                    OR u.residence_number ILIKE $1)
               AND ($2::DATE IS NULL OR v.visit_date >= $2)
               AND ($3::DATE IS NULL OR v.visit_date <= $3)
               AND ($4::BOOLEAN IS NULL OR (v.visited_at IS NOT NULL) = $4)
               AND ($5::BOOLEAN IS NULL OR v.photos_uploaded = $5)
             ORDER BY v.created_at DESC, v.id DESC
             LIMIT $6 OFFSET $7"
        );
        sqlx::query_as::<_, VisitorDetails>(&query)
            .bind(filter.search_pattern())
            .bind(filter.date_from)
            .bind(filter.date_to)
            .bind(filter.visited())
            .bind(filter.photos_uploaded())
            .bind(clamp_limit(limit))
            .bind(clamp_offset(offset))
            .fetch_all(pool)
            .await
    }

    /// Attach photo references if none were attached before.
    ///
    /// Returns `None` when the visit does not exist or already has photos.
    pub async fn attach_photos(
        pool: &PgPool,
        id: DbId,
        photos: &[String],
    ) -> Result<Option<Visitor>, sqlx::Error> {
        let query = format!(
            "UPDATE visitors SET photos = $2, photos_uploaded = true
             WHERE id = $1 AND photos_uploaded = false
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Visitor>(&query)
            .bind(id)
            .bind(photos)
            .fetch_optional(pool)
            .await
    }

    /// Hard-delete a visit, returning its photo references so the caller can
    /// clean up external storage. `None` if no such visit.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<Vec<String>>, sqlx::Error> {
        sqlx::query_scalar::<_, Vec<String>>("DELETE FROM visitors WHERE id = $1 RETURNING photos")
            .bind(id)
            .fetch_optional(pool)
            .await
    }
}
