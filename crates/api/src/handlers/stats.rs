//! Handlers for the `/stats` resource (administrator dashboard).

use axum::extract::{Query, State};
use axum::Json;
use visitgate_core::stats::{DayStat, GeneralStats, MonthStat, ResidenceStat, RoleStat};

use crate::error::AppResult;
use crate::middleware::rbac::RequireAdmin;
use crate::query::{DaysParams, LimitParams};
use crate::response::DataResponse;
use crate::state::AppState;
use crate::statistics::{Dashboard, StatsService};

/// GET /api/v1/stats/dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Dashboard>>> {
    let data = StatsService::from_state(&state).dashboard().await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/stats/general
pub async fn general(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<GeneralStats>>> {
    let data = StatsService::from_state(&state).general_stats().await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/stats/visitors-by-day?days=30
pub async fn visitors_by_day(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<DaysParams>,
) -> AppResult<Json<DataResponse<Vec<DayStat>>>> {
    let data = StatsService::from_state(&state)
        .visitors_by_day(params.days)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/stats/visitors-by-residence?limit=10
pub async fn visitors_by_residence(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<ResidenceStat>>>> {
    let data = StatsService::from_state(&state)
        .visitors_by_residence(params.limit)
        .await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/stats/monthly
pub async fn monthly(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<MonthStat>>>> {
    let data = StatsService::from_state(&state).monthly_stats().await?;
    Ok(Json(DataResponse { data }))
}

/// GET /api/v1/stats/users-by-role
pub async fn users_by_role(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<RoleStat>>>> {
    let data = StatsService::from_state(&state).users_by_role().await?;
    Ok(Json(DataResponse { data }))
}
