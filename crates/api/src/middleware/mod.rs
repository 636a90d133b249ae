//! Request middleware.

pub mod auth;

pub use auth::operator_auth;
