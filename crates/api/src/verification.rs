//! Gate-side visit verification.
//!
//! A visit code is a single-day pass: it matches only on the local calendar
//! day its visit is scheduled for. Completing a visit is set-once.

use chrono::NaiveDate;
use sqlx::PgPool;
use visitgate_core::calendar::Calendar;
use visitgate_core::clock::Clock;
use visitgate_core::error::CoreError;
use visitgate_core::types::{DbId, Timestamp};
use visitgate_core::visit_code::normalize_code;
use visitgate_core::visitor::Verification;
use visitgate_db::models::visitor::VisitProjection;
use visitgate_db::repositories::VisitorRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// Verification operations bound to one pool, clock, and calendar.
pub struct VisitVerifier<'a> {
    pool: &'a PgPool,
    clock: &'a dyn Clock,
    calendar: Calendar,
}

impl<'a> VisitVerifier<'a> {
    pub fn new(pool: &'a PgPool, clock: &'a dyn Clock, calendar: Calendar) -> Self {
        Self {
            pool,
            clock,
            calendar,
        }
    }

    pub fn from_state(state: &'a AppState) -> Self {
        Self::new(&state.pool, state.clock.as_ref(), state.config.calendar)
    }

    /// Check `code` against visits scheduled on the local day containing
    /// `as_of` (now when absent).
    ///
    /// A blank code, an unknown code, and a code for another day are all
    /// [`Verification::NotValid`].
    pub async fn verify_code(
        &self,
        code: &str,
        as_of: Option<Timestamp>,
    ) -> Result<Verification<VisitProjection>, sqlx::Error> {
        let Some(code) = normalize_code(code) else {
            return Ok(Verification::NotValid);
        };
        let day = self.calendar.local_date(as_of.unwrap_or_else(|| self.clock.now()));

        let found = VisitorRepo::find_by_code_on(self.pool, code, day).await?;
        Ok(match found {
            Some(visit) => Verification::Valid(visit),
            None => Verification::NotValid,
        })
    }

    /// Record the visit as completed at `as_of` (now when absent).
    ///
    /// Idempotent: an already completed visit keeps its first timestamp.
    pub async fn mark_visited(
        &self,
        visitor_id: DbId,
        as_of: Option<Timestamp>,
    ) -> AppResult<VisitProjection> {
        let at = as_of.unwrap_or_else(|| self.clock.now());
        VisitorRepo::mark_visited(self.pool, visitor_id, at)
            .await?
            .ok_or_else(|| CoreError::visitor_not_found(visitor_id).into())
    }

    /// Visits scheduled in `[start, end)`, newest-created first.
    pub async fn list_for_window(
        &self,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<Vec<VisitProjection>, sqlx::Error> {
        VisitorRepo::list_for_window(self.pool, start, end).await
    }

    /// Visits scheduled for the current local day.
    pub async fn list_today(&self) -> Result<Vec<VisitProjection>, sqlx::Error> {
        let today = self.calendar.local_date(self.clock.now());
        self.list_for_window(today, today.succ_opt().unwrap_or(today))
            .await
    }
}
