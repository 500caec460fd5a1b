//! Route definitions for the `/admin` resource.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

/// Routes mounted at `/admin` (administrator only).
///
/// ```text
/// GET    /visitors       -> list_visitors (filters + pagination)
/// DELETE /visitors/{id}  -> delete_visitor
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/visitors", get(admin::list_visitors))
        .route("/visitors/{id}", delete(admin::delete_visitor))
}
