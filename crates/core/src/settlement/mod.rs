//! Pending-settlement bookkeeping.
//!
//! The payment gateway cannot split PIX transfers atomically, so the
//! platform's share of every approved payment is tracked here until an
//! operator transfers it out-of-band:
//! - Ledger entries and their PENDING -> RESOLVED lifecycle
//! - The append-only ledger abstraction and an in-memory implementation
//! - Reconciliation report aggregation
//! - Settlement service wiring calculator, configuration and ledger
//! - Error types for settlement operations

pub mod entry;
pub mod error;
pub mod ledger;
pub mod report;
pub mod service;

pub use entry::{PendingSettlementEntry, SettlementStatus};
pub use error::SettlementError;
pub use ledger::{InMemorySettlementLedger, SettlementLedger};
pub use report::{ReportSummary, build_report};
pub use service::SettlementService;
