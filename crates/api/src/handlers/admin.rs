//! Handlers for the `/admin/visitors` resource (visitor management).

use axum::extract::{Path, Query, State};
use axum::Json;
use serde::Serialize;
use visitgate_core::error::CoreError;
use visitgate_core::types::DbId;
use visitgate_db::models::visitor::{VisitorDetails, VisitorFilter};
use visitgate_db::repositories::VisitorRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireAdmin;
use crate::query::PaginationParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// Result of deleting a visit. `photos` lists the references the caller
/// should remove from external storage.
#[derive(Debug, Serialize)]
pub struct DeletedVisitor {
    pub id: DbId,
    pub photos: Vec<String>,
}

/// GET /api/v1/admin/visitors
///
/// Filters: `search` (visitor name, code, or residence), `date_from`,
/// `date_to`, `status` (`visited` / `pending`), `photos` (`with` / `without`),
/// plus `limit` / `offset`.
pub async fn list_visitors(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Query(filter): Query<VisitorFilter>,
    Query(page): Query<PaginationParams>,
) -> AppResult<Json<DataResponse<Vec<VisitorDetails>>>> {
    if let (Some(from), Some(to)) = (filter.date_from, filter.date_to) {
        if from > to {
            return Err(AppError::BadRequest(
                "date_from must not be after date_to".into(),
            ));
        }
    }

    let visits = VisitorRepo::search(&state.pool, &filter, page.limit, page.offset).await?;
    Ok(Json(DataResponse { data: visits }))
}

/// DELETE /api/v1/admin/visitors/{id}
pub async fn delete_visitor(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<DeletedVisitor>>> {
    let photos = VisitorRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::visitor_not_found(id)))?;

    tracing::info!(
        visitor_id = id,
        admin_id = admin.user_id,
        photos = photos.len(),
        "Visitor deleted"
    );

    Ok(Json(DataResponse {
        data: DeletedVisitor { id, photos },
    }))
}
