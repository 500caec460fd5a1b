//! Route definitions for the `/visitors` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::visitors;
use crate::state::AppState;

/// Routes mounted at `/visitors`.
///
/// ```text
/// POST /               -> create_visitor (any role)
/// GET  /history        -> history (any role, own visitors)
/// GET  /today          -> today (guard/admin)
/// POST /verify         -> verify (guard/admin)
/// GET  /{id}           -> get_visitor (guard/admin)
/// GET  /{id}/pass      -> visitor_pass (host only)
/// POST /{id}/visit     -> mark_visited (guard/admin)
/// GET  /{id}/photos    -> list_photos (guard/admin)
/// PUT  /{id}/photos    -> attach_photos (guard/admin)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(visitors::create_visitor))
        .route("/history", get(visitors::history))
        .route("/today", get(visitors::today))
        .route("/verify", post(visitors::verify))
        .route("/{id}", get(visitors::get_visitor))
        .route("/{id}/pass", get(visitors::visitor_pass))
        .route("/{id}/visit", post(visitors::mark_visited))
        .route(
            "/{id}/photos",
            get(visitors::list_photos).put(visitors::attach_photos),
        )
}
