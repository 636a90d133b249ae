//! Payment split computation.
//!
//! This module divides an approved payment between the merchant and the
//! platform:
//! - Integer minor-unit split helper (no floating point, no rounding leakage)
//! - Validated split configuration and a shared, updatable handle
//! - Split calculator producing immutable split results
//! - Error types for invalid split inputs

pub mod calculator;
pub mod config;
pub mod error;
pub mod money;

#[cfg(test)]
mod props;

pub use calculator::{SplitCalculator, SplitResult};
pub use config::{MAX_PERCENT_SCALE, PlatformPercent, SplitConfigHandle, SplitConfiguration};
pub use error::SplitError;
pub use money::split_amount;
