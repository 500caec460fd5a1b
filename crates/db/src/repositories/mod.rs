//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods
//! that accept `&PgPool` as the first argument.

pub mod stats_repo;
pub mod user_repo;
pub mod visitor_repo;

pub use stats_repo::StatsRepo;
pub use user_repo::UserRepo;
pub use visitor_repo::VisitorRepo;
