//! Row structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` struct matching the database row
//! - Create / update DTOs used by the repositories
//! - Read projections shared with the API layer

pub mod stats;
pub mod user;
pub mod visitor;
