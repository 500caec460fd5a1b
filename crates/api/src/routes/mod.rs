pub mod admin;
pub mod auth;
pub mod health;
pub mod stats;
pub mod users;
pub mod visitors;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/register                  self-registration (public)
/// /auth/login                     login (public)
/// /auth/me                        current user (requires auth)
///
/// /users                          list, create (admin only)
/// /users/import                   CSV bulk import (admin only)
/// /users/{id}                     get, update, delete (admin only)
///
/// /visitors                       register visitor (any role)
/// /visitors/history               own visitors (any role)
/// /visitors/today                 today's visits (guard/admin)
/// /visitors/verify                verify a code (guard/admin)
/// /visitors/{id}                  visit details (guard/admin)
/// /visitors/{id}/pass             code + share link (host only)
/// /visitors/{id}/visit            mark visited (guard/admin)
/// /visitors/{id}/photos           list, attach once (guard/admin)
///
/// /admin/visitors                 filtered listing (admin only)
/// /admin/visitors/{id}            delete (admin only)
///
/// /stats/dashboard                all views (admin only)
/// /stats/general                  counters
/// /stats/visitors-by-day          trailing day series
/// /stats/visitors-by-residence    residence ranking
/// /stats/monthly                  monthly rollup
/// /stats/users-by-role            accounts per role
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/users", users::router())
        .nest("/visitors", visitors::router())
        .nest("/admin", admin::router())
        .nest("/stats", stats::router())
}
