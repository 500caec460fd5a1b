//! Dashboard statistics.
//!
//! Every view is a pure read computed from current rows. Aggregation runs in
//! SQL; gap filling, labels, and derived `pending` counts come from
//! `visitgate_core::stats`.

use serde::Serialize;
use sqlx::PgPool;
use visitgate_core::calendar::Calendar;
use visitgate_core::clock::Clock;
use visitgate_core::stats::{
    clamp_days, clamp_residence_limit, fill_day_series, month_stats, residence_stats, DayStat,
    GeneralStats, MonthStat, ResidenceStat, RoleStat,
};
use visitgate_db::repositories::StatsRepo;

use crate::state::AppState;

/// All five views in one payload, as loaded by the admin dashboard.
#[derive(Debug, Serialize)]
pub struct Dashboard {
    pub general: GeneralStats,
    pub visitors_by_day: Vec<DayStat>,
    pub visitors_by_residence: Vec<ResidenceStat>,
    pub monthly: Vec<MonthStat>,
    pub users_by_role: Vec<RoleStat>,
}

pub struct StatsService<'a> {
    pool: &'a PgPool,
    clock: &'a dyn Clock,
    calendar: Calendar,
}

impl<'a> StatsService<'a> {
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

    fn today(&self) -> chrono::NaiveDate {
        self.calendar.local_date(self.clock.now())
    }

    /// Headline counters. `visited_today` counts completions inside today's
    /// local window, whichever day those visits were scheduled for.
    pub async fn general_stats(&self) -> Result<GeneralStats, sqlx::Error> {
        let today = self.today();
        let (start, end) = self.calendar.day_window(today);

        let (total_users, total_visitors, visitors_today, visited_today) = tokio::try_join!(
            StatsRepo::count_users(self.pool),
            StatsRepo::count_visitors(self.pool),
            StatsRepo::count_scheduled_on(self.pool, today),
            StatsRepo::count_visited_between(self.pool, start, end),
        )?;

        Ok(GeneralStats::new(
            total_users,
            total_visitors,
            visitors_today,
            visited_today,
        ))
    }

    /// One entry per day from `today - days` through today. `days` defaults
    /// to 30 and is clamped to `0..=366`.
    pub async fn visitors_by_day(&self, days: Option<i64>) -> Result<Vec<DayStat>, sqlx::Error> {
        let today = self.today();
        let window = Calendar::trailing_days(today, clamp_days(days));
        let first = window.first().copied().unwrap_or(today);

        let counts: Vec<_> = StatsRepo::visits_by_day(self.pool, first, today)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        Ok(fill_day_series(&window, &counts))
    }

    /// Top residences by visit count. `limit` defaults to 10 and is clamped
    /// to `1..=100`.
    pub async fn visitors_by_residence(
        &self,
        limit: Option<i64>,
    ) -> Result<Vec<ResidenceStat>, sqlx::Error> {
        let rows = StatsRepo::visits_by_residence(self.pool, clamp_residence_limit(limit)).await?;
        Ok(residence_stats(rows.into_iter().map(Into::into).collect()))
    }

    /// Months from January of last year through the current month that have
    /// at least one visit.
    pub async fn monthly_stats(&self) -> Result<Vec<MonthStat>, sqlx::Error> {
        let (start, end) = Calendar::monthly_window(self.today());
        let rows = StatsRepo::visits_by_month(self.pool, start, end).await?;
        Ok(month_stats(rows.into_iter().map(Into::into).collect()))
    }

    /// Account counts for each role that has at least one account.
    pub async fn users_by_role(&self) -> Result<Vec<RoleStat>, sqlx::Error> {
        let rows = StatsRepo::users_by_role(self.pool).await?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    /// Every view with default parameters, fetched concurrently.
    pub async fn dashboard(&self) -> Result<Dashboard, sqlx::Error> {
        let (general, visitors_by_day, visitors_by_residence, monthly, users_by_role) = tokio::try_join!(
            self.general_stats(),
            self.visitors_by_day(None),
            self.visitors_by_residence(None),
            self.monthly_stats(),
            self.users_by_role(),
        )?;

        Ok(Dashboard {
            general,
            visitors_by_day,
            visitors_by_residence,
            monthly,
            users_by_role,
        })
    }
}
