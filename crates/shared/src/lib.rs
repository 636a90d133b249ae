//! Shared types, errors, and configuration for the PDV settlement ledger.
//!
//! This crate provides common types used across all other crates:
//! - Money and currency types with decimal precision
//! - Typed IDs for ledger entries
//! - Pagination types for list endpoints
//! - Application-wide error types
//! - Configuration management

pub mod config;
pub mod error;
pub mod types;

pub use config::{AppConfig, DatabaseConfig, SplitSettings};
pub use error::AppError;
