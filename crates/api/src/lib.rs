//! Visitor management API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, and
//! the verification and statistics services) so integration tests and the
//! binary entrypoint can both use them.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod query;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod statistics;
pub mod verification;
