//! Pure domain logic for the visitor management service.
//!
//! Nothing in this crate touches the database or performs I/O. Types,
//! validation, calendar arithmetic, and statistics shaping live here so the
//! `db` and `api` crates can share them.

pub mod account;
pub mod calendar;
pub mod clock;
pub mod error;
pub mod import;
pub mod roles;
pub mod share;
pub mod stats;
pub mod types;
pub mod visit_code;
pub mod visitor;
