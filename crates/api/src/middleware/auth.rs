//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use visitgate_core::error::CoreError;
use visitgate_core::roles::{authorize, Capability, Role};
use visitgate_core::types::DbId;
use visitgate_db::repositories::UserRepo;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
///
/// The token only identifies the caller. The account is reloaded on every
/// request and its current role is the one enforced.
///
/// ```ignore
/// async fn my_handler(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, role = %user.role, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    pub role: Role,
}

impl AuthUser {
    /// Reject with 403 unless the caller's role grants `capability`.
    pub fn require(&self, capability: Capability, message: &str) -> Result<(), AppError> {
        if authorize(self.role, capability).is_allowed() {
            Ok(())
        } else {
            Err(AppError::Core(CoreError::Forbidden(message.into())))
        }
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        // The stored row is authoritative: a deleted account loses access and a
        // role change applies to tokens issued before it.
        let user = UserRepo::find_by_id(&state.pool, claims.sub)
            .await?
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Account no longer exists".into()))
            })?;

        if user.role != claims.role {
            tracing::debug!(
                user_id = user.id,
                token_role = %claims.role,
                role = %user.role,
                "Token role is stale, using stored role"
            );
        }

        Ok(AuthUser {
            user_id: user.id,
            role: user.role,
        })
    }
}
