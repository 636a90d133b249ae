//! `SeaORM` entity definitions.

pub mod settlement_entries;
