//! Handlers for the `/visitors` resource.
//!
//! Residents register and review their own visitors; guards (and
//! administrators) verify codes and record arrivals at the gate.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use visitgate_core::error::CoreError;
use visitgate_core::roles::Capability;
use visitgate_core::share::{pass_message, whatsapp_share_url};
use visitgate_core::types::DbId;
use visitgate_core::visit_code::{generate_visit_code, MAX_CODE_ATTEMPTS};
use visitgate_core::visitor::{
    validate_photo_refs, validate_visitor_fields, Verification, VisitorFields,
    CODE_NOT_VALID_MESSAGE,
};
use visitgate_db::models::visitor::{CreateVisitor, VisitProjection, Visitor, VisitorDetails};
use visitgate_db::repositories::VisitorRepo;

use crate::error::{is_unique_violation, AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::RequireGuard;
use crate::response::DataResponse;
use crate::state::AppState;
use crate::verification::VisitVerifier;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

/// Request body for `POST /visitors`.
#[derive(Debug, Deserialize)]
pub struct CreateVisitorRequest {
    pub visitor_name: String,
    pub visitor_phone: String,
    pub visit_date: NaiveDate,
    pub visit_time: String,
    pub visit_reason: String,
}

/// Request body for `POST /visitors/verify`.
#[derive(Debug, Deserialize)]
pub struct VerifyRequest {
    pub code: String,
}

/// Outcome of a gate check. `valid: false` is a normal answer, not an error.
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visitor: Option<VisitProjection>,
}

impl From<Verification<VisitProjection>> for VerifyResponse {
    fn from(outcome: Verification<VisitProjection>) -> Self {
        match outcome {
            Verification::Valid(visit) => Self {
                valid: true,
                message: None,
                visitor: Some(visit),
            },
            Verification::NotValid => Self {
                valid: false,
                message: Some(CODE_NOT_VALID_MESSAGE),
                visitor: None,
            },
        }
    }
}

/// A visitor pass for the host to share.
#[derive(Debug, Serialize)]
pub struct VisitorPass {
    pub id: DbId,
    pub visit_code: String,
    pub visitor_name: String,
    pub visit_date: NaiveDate,
    pub visit_time: String,
    pub message: String,
    pub whatsapp_url: String,
}

/// Request body for `PUT /visitors/{id}/photos`.
#[derive(Debug, Deserialize)]
pub struct AttachPhotosRequest {
    pub photos: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct VisitorPhotos {
    pub id: DbId,
    pub photos_uploaded: bool,
    pub photos: Vec<String>,
}

impl From<Visitor> for VisitorPhotos {
    fn from(v: Visitor) -> Self {
        Self {
            id: v.id,
            photos_uploaded: v.photos_uploaded,
            photos: v.photos,
        }
    }
}

// ---------------------------------------------------------------------------
// Resident handlers
// ---------------------------------------------------------------------------

/// POST /api/v1/visitors
///
/// Register a visitor hosted by the caller. The visit code is generated here
/// and retried on the rare collision with an existing code.
pub async fn create_visitor(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<CreateVisitorRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Visitor>>)> {
    auth.require(Capability::RegisterVisitors, "Not allowed to register visitors")?;

    validate_visitor_fields(&VisitorFields {
        visitor_name: &input.visitor_name,
        visitor_phone: &input.visitor_phone,
        visit_time: &input.visit_time,
        visit_reason: &input.visit_reason,
    })?;

    let mut dto = CreateVisitor {
        visit_code: String::new(),
        visitor_name: input.visitor_name.trim().to_string(),
        visitor_phone: input.visitor_phone.trim().to_string(),
        visit_date: input.visit_date,
        visit_time: input.visit_time.trim().to_string(),
        visit_reason: input.visit_reason.trim().to_string(),
        resident_id: auth.user_id,
    };

    for attempt in 1..=MAX_CODE_ATTEMPTS {
        dto.visit_code = generate_visit_code();
        match VisitorRepo::create(&state.pool, &dto).await {
            Ok(visitor) => {
                tracing::info!(
                    visitor_id = visitor.id,
                    resident_id = auth.user_id,
                    visit_date = %visitor.visit_date,
                    "Visitor registered"
                );
                return Ok((StatusCode::CREATED, Json(DataResponse { data: visitor })));
            }
            Err(e) if is_unique_violation(&e, "uq_visitors_visit_code") => {
                tracing::warn!(attempt, "Visit code collision, regenerating");
            }
            Err(e) => return Err(e.into()),
        }
    }

    Err(AppError::InternalError(format!(
        "Could not generate a unique visit code after {MAX_CODE_ATTEMPTS} attempts"
    )))
}

/// GET /api/v1/visitors/history
///
/// The caller's own visitors, newest first.
pub async fn history(
    State(state): State<AppState>,
    auth: AuthUser,
) -> AppResult<Json<DataResponse<Vec<VisitProjection>>>> {
    let visits = VisitorRepo::list_for_resident(&state.pool, auth.user_id).await?;
    Ok(Json(DataResponse { data: visits }))
}

/// GET /api/v1/visitors/{id}/pass
///
/// Visit code and share link for one of the caller's own visitors. Other
/// residents' visitors are reported as not found.
pub async fn visitor_pass(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<VisitorPass>>> {
    let visitor = VisitorRepo::find_by_id(&state.pool, id)
        .await?
        .filter(|v| v.resident_id == Some(auth.user_id))
        .ok_or(AppError::Core(CoreError::visitor_not_found(id)))?;

    let pass = VisitorPass {
        message: pass_message(&visitor.visit_code, &visitor.visitor_name),
        whatsapp_url: whatsapp_share_url(&visitor.visit_code, &visitor.visitor_name),
        id: visitor.id,
        visit_code: visitor.visit_code,
        visitor_name: visitor.visitor_name,
        visit_date: visitor.visit_date,
        visit_time: visitor.visit_time,
    };
    Ok(Json(DataResponse { data: pass }))
}

// ---------------------------------------------------------------------------
// Gate handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/visitors/today
pub async fn today(
    State(state): State<AppState>,
    RequireGuard(_guard): RequireGuard,
) -> AppResult<Json<DataResponse<Vec<VisitProjection>>>> {
    let visits = VisitVerifier::from_state(&state).list_today().await?;
    Ok(Json(DataResponse { data: visits }))
}

/// POST /api/v1/visitors/verify
pub async fn verify(
    State(state): State<AppState>,
    RequireGuard(guard): RequireGuard,
    Json(input): Json<VerifyRequest>,
) -> AppResult<Json<DataResponse<VerifyResponse>>> {
    let outcome = VisitVerifier::from_state(&state)
        .verify_code(&input.code, None)
        .await?;

    match &outcome {
        Verification::Valid(visit) => {
            tracing::info!(guard_id = guard.user_id, visitor_id = visit.id, "Visit code accepted")
        }
        Verification::NotValid => {
            tracing::info!(guard_id = guard.user_id, "Visit code rejected")
        }
    }

    Ok(Json(DataResponse {
        data: outcome.into(),
    }))
}

/// GET /api/v1/visitors/{id}
pub async fn get_visitor(
    State(state): State<AppState>,
    RequireGuard(_guard): RequireGuard,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<VisitorDetails>>> {
    let details = VisitorRepo::find_details(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::visitor_not_found(id)))?;
    Ok(Json(DataResponse { data: details }))
}

/// POST /api/v1/visitors/{id}/visit
///
/// Record the arrival. Repeating the call is harmless and keeps the first
/// arrival time.
pub async fn mark_visited(
    State(state): State<AppState>,
    RequireGuard(guard): RequireGuard,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<VisitProjection>>> {
    let visit = VisitVerifier::from_state(&state)
        .mark_visited(id, None)
        .await?;
    tracing::info!(guard_id = guard.user_id, visitor_id = id, "Visit marked as visited");
    Ok(Json(DataResponse { data: visit }))
}

/// PUT /api/v1/visitors/{id}/photos
///
/// Attach photo references taken at the gate. Photos can be attached once;
/// a second batch is rejected with 409.
pub async fn attach_photos(
    State(state): State<AppState>,
    RequireGuard(guard): RequireGuard,
    Path(id): Path<DbId>,
    Json(input): Json<AttachPhotosRequest>,
) -> AppResult<Json<DataResponse<VisitorPhotos>>> {
    validate_photo_refs(&input.photos)?;

    match VisitorRepo::attach_photos(&state.pool, id, &input.photos).await? {
        Some(visitor) => {
            tracing::info!(
                guard_id = guard.user_id,
                visitor_id = id,
                count = visitor.photos.len(),
                "Visit photos attached"
            );
            Ok(Json(DataResponse {
                data: visitor.into(),
            }))
        }
        None => match VisitorRepo::find_by_id(&state.pool, id).await? {
            Some(_) => Err(AppError::Core(CoreError::Conflict(
                "Photos were already uploaded for this visit".into(),
            ))),
            None => Err(AppError::Core(CoreError::visitor_not_found(id))),
        },
    }
}

/// GET /api/v1/visitors/{id}/photos
pub async fn list_photos(
    State(state): State<AppState>,
    RequireGuard(_guard): RequireGuard,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<VisitorPhotos>>> {
    let visitor = VisitorRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::visitor_not_found(id)))?;
    Ok(Json(DataResponse {
        data: visitor.into(),
    }))
}
