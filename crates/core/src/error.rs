use crate::types::DbId;

/// Domain-level failures shared by the `db` and `api` crates.
///
/// A verification code that matches no current visit is *not* an error; see
/// [`crate::visitor::Verification`].
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CoreError {
    /// Shorthand for the visitor lookup miss reported by most guard routes.
    pub fn visitor_not_found(id: DbId) -> Self {
        Self::NotFound {
            entity: "Visitor",
            id,
        }
    }

    /// Shorthand for a missing user account.
    pub fn user_not_found(id: DbId) -> Self {
        Self::NotFound {
            entity: "User",
            id,
        }
    }
}
