//! Route definitions for the `/users` resource.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use visitgate_core::import::MAX_IMPORT_BYTES;

use crate::handlers::{import, users};
use crate::state::AppState;

/// Headroom for multipart boundaries and headers around the file itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// Routes mounted at `/users` (administrator only).
///
/// ```text
/// GET    /         -> list_users
/// POST   /         -> create_user
/// POST   /import   -> import_users (multipart CSV)
/// GET    /{id}     -> get_user
/// PUT    /{id}     -> update_user
/// DELETE /{id}     -> delete_user
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(users::list_users).post(users::create_user))
        .route(
            "/import",
            post(import::import_users)
                .layer(DefaultBodyLimit::max(MAX_IMPORT_BYTES + MULTIPART_OVERHEAD_BYTES)),
        )
        .route(
            "/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
}
