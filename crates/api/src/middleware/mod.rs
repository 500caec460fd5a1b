//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the authenticated user from a JWT Bearer token.
//! - [`rbac::RequireGuard`] -- Requires gate access (guard or administrator).
//! - [`rbac::RequireAdmin`] -- Requires the administrator role.

pub mod auth;
pub mod rbac;
