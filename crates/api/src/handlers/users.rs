//! Handlers for the `/users` resource (account administration).
//!
//! All handlers require the administrator role via [`RequireAdmin`].

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use visitgate_core::account::{validate_password, AccountFields};
use visitgate_core::error::CoreError;
use visitgate_core::roles::Role;
use visitgate_core::types::DbId;
use visitgate_db::models::user::{CreateUser, UpdateUser, UserResponse};
use visitgate_db::repositories::UserRepo;

use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::handlers::auth::duplicate_account;
use crate::middleware::rbac::RequireAdmin;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /users`.
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub residence_number: String,
    pub email: String,
    pub phone: String,
    pub password: String,
    /// Defaults to `resident`.
    pub role: Option<Role>,
}

/// Request body for `PUT /users/{id}`. Absent fields are left unchanged.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub residence_number: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
    pub role: Option<Role>,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/users
pub async fn list_users(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
) -> AppResult<Json<DataResponse<Vec<UserResponse>>>> {
    let users = UserRepo::list(&state.pool).await?;
    Ok(Json(DataResponse {
        data: users.into_iter().map(UserResponse::from).collect(),
    }))
}

/// POST /api/v1/users
pub async fn create_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Json(input): Json<CreateUserRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<UserResponse>>)> {
    let account = AccountFields::parse(&input.residence_number, &input.email, &input.phone)?;
    validate_password(&input.password)?;

    if let Some(existing) =
        UserRepo::find_conflict(&state.pool, &account.email, &account.residence_number, None)
            .await?
    {
        return Err(duplicate_account(&existing, &account));
    }

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;

    let user = UserRepo::create(
        &state.pool,
        &CreateUser {
            residence_number: account.residence_number,
            email: account.email,
            phone: account.phone,
            password_hash,
            role: input.role.unwrap_or(Role::Resident),
        },
    )
    .await?;

    tracing::info!(user_id = user.id, role = %user.role, admin_id = admin.user_id, "User created");

    Ok((
        StatusCode::CREATED,
        Json(DataResponse { data: user.into() }),
    ))
}

/// GET /api/v1/users/{id}
pub async fn get_user(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let user = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::user_not_found(id)))?;
    Ok(Json(DataResponse { data: user.into() }))
}

/// PUT /api/v1/users/{id}
///
/// Email and residence number stay unique: a value held by another account
/// is rejected with 409.
pub async fn update_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
    Json(input): Json<UpdateUserRequest>,
) -> AppResult<Json<DataResponse<UserResponse>>> {
    let current = UserRepo::find_by_id(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::user_not_found(id)))?;

    // Validate the merged profile so a partial update cannot blank a field.
    let account = AccountFields::parse(
        input
            .residence_number
            .as_deref()
            .unwrap_or(&current.residence_number),
        input.email.as_deref().unwrap_or(&current.email),
        input.phone.as_deref().unwrap_or(&current.phone),
    )?;

    if let Some(existing) = UserRepo::find_conflict(
        &state.pool,
        &account.email,
        &account.residence_number,
        Some(id),
    )
    .await?
    {
        return Err(duplicate_account(&existing, &account));
    }

    let password_hash = match input.password.as_deref() {
        Some(password) => {
            validate_password(password)?;
            Some(
                hash_password(password)
                    .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?,
            )
        }
        None => None,
    };

    let updated = UserRepo::update(
        &state.pool,
        id,
        &UpdateUser {
            residence_number: Some(account.residence_number),
            email: Some(account.email),
            phone: Some(account.phone),
            password_hash,
            role: input.role,
        },
    )
    .await?
    .ok_or(AppError::Core(CoreError::user_not_found(id)))?;

    tracing::info!(user_id = id, admin_id = admin.user_id, "User updated");

    Ok(Json(DataResponse {
        data: updated.into(),
    }))
}

/// DELETE /api/v1/users/{id}
///
/// The user's visits are kept, detached from any resident.
pub async fn delete_user(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    Path(id): Path<DbId>,
) -> AppResult<StatusCode> {
    if id == admin.user_id {
        return Err(AppError::BadRequest(
            "Administrators cannot delete their own account".into(),
        ));
    }

    if !UserRepo::delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::user_not_found(id)));
    }

    tracing::info!(user_id = id, admin_id = admin.user_id, "User deleted");
    Ok(StatusCode::NO_CONTENT)
}
