//! Repository implementations for database operations.

pub mod settlement;

pub use settlement::SettlementRepository;
