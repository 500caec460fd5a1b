//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use visitgate_core::roles::Role;
use visitgate_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the password hash -- NEVER serialize this to API responses directly.
/// Use [`UserResponse`] for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub residence_number: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    #[sqlx(try_from = "String")]
    pub role: Role,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Safe user representation for API responses (no password hash).
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: DbId,
    pub residence_number: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            residence_number: user.residence_number,
            email: user.email,
            phone: user.phone,
            role: user.role,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// DTO for inserting a user with an explicit role.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub residence_number: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
    pub role: Role,
}

/// DTO for self-registration. The role is decided by the database: the
/// first account becomes administrator, every later one a resident.
#[derive(Debug, Clone)]
pub struct RegisterUser {
    pub residence_number: String,
    pub email: String,
    pub phone: String,
    pub password_hash: String,
}

/// DTO for updating an existing user. Only `Some` fields are applied.
#[derive(Debug, Clone, Default)]
pub struct UpdateUser {
    pub residence_number: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password_hash: Option<String>,
    pub role: Option<Role>,
}
