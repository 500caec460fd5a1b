//! Route definitions for the `/stats` resource.

use axum::routing::get;
use axum::Router;

use crate::handlers::stats;
use crate::state::AppState;

/// Routes mounted at `/stats` (administrator only).
///
/// ```text
/// GET /dashboard                     -> dashboard (all views)
/// GET /general                       -> general
/// GET /visitors-by-day?days=         -> visitors_by_day
/// GET /visitors-by-residence?limit=  -> visitors_by_residence
/// GET /monthly                       -> monthly
/// GET /users-by-role                 -> users_by_role
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(stats::dashboard))
        .route("/general", get(stats::general))
        .route("/visitors-by-day", get(stats::visitors_by_day))
        .route("/visitors-by-residence", get(stats::visitors_by_residence))
        .route("/monthly", get(stats::monthly))
        .route("/users-by-role", get(stats::users_by_role))
}
