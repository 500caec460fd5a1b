//! Role-based access control (RBAC) extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects requests whose role does not
//! grant the route's [`Capability`], so authorization is visible in the
//! handler signature.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use visitgate_core::roles::Capability;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

/// Requires gate access (guard or administrator). Rejects with 403 otherwise.
///
/// ```ignore
/// async fn verify(RequireGuard(user): RequireGuard) -> AppResult<Json<()>> {
///     Ok(Json(()))
/// }
/// ```
pub struct RequireGuard(pub AuthUser);

impl FromRequestParts<AppState> for RequireGuard {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.require(Capability::GuardGate, "Guard or Administrator role required")?;
        Ok(RequireGuard(user))
    }
}

/// Requires the administrator role. Rejects with 403 otherwise.
///
/// Guards the users, import, admin visitor and statistics routes.
pub struct RequireAdmin(pub AuthUser);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, state).await?;
        user.require(Capability::Administer, "Administrator role required")?;
        Ok(RequireAdmin(user))
    }
}
