//! Core split and settlement logic for the PDV.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `split` - Merchant/platform split of approved payments
//! - `settlement` - Pending-settlement ledger, reconciliation report and service
//! - `clock` - Injectable time source

pub mod clock;
pub mod settlement;
pub mod split;
