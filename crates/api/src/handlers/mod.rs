pub mod admin;
pub mod auth;
pub mod import;
pub mod stats;
pub mod users;
pub mod visitors;
