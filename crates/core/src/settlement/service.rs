//! Settlement service.
//!
//! Entry point for the rest of the application: turns approved payments
//! into ledger entries and exposes the reconciliation workflow.

use std::sync::Arc;

use pdv_shared::types::{PageRequest, PageResponse, SettlementEntryId};
use rust_decimal::Decimal;
use tracing::{info, warn};

use super::entry::PendingSettlementEntry;
use super::error::SettlementError;
use super::ledger::SettlementLedger;
use super::report::{ReportSummary, build_report};
use crate::split::{SplitCalculator, SplitConfigHandle, SplitConfiguration};

/// Coordinates split computation, configuration and the ledger.
///
/// Cheap to share behind an `Arc`; all state lives in the ledger and the
/// configuration handle.
pub struct SettlementService {
    ledger: Arc<dyn SettlementLedger>,
    config: SplitConfigHandle,
}

impl SettlementService {
    /// Creates a service over `ledger` using the live `config`.
    #[must_use]
    pub fn new(ledger: Arc<dyn SettlementLedger>, config: SplitConfigHandle) -> Self {
        Self { ledger, config }
    }

    /// Splits an approved payment and records the platform share as pending.
    ///
    /// The split uses a snapshot of the configuration taken on entry, so a
    /// concurrent update affects only later payments.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a blank reference or a bad total, and
    /// the ledger's error if recording fails. On a recording failure the
    /// payment itself has already been approved: retry this call, never the
    /// payment.
    pub async fn settle_approved_payment(
        &self,
        transaction_reference: &str,
        total_amount: Decimal,
    ) -> Result<PendingSettlementEntry, SettlementError> {
        let config = self.config.current();
        let split = SplitCalculator::compute_split(transaction_reference, total_amount, &config)?;

        let entry = match self.ledger.record(split).await {
            Ok(entry) => entry,
            Err(err) => {
                warn!(
                    transaction_reference = %transaction_reference.trim(),
                    error = %err,
                    "Failed to record pending settlement"
                );
                return Err(err);
            }
        };

        info!(
            entry_id = %entry.id(),
            transaction_reference = %entry.split().transaction_reference(),
            total = %entry.split().total(),
            platform_share = %entry.split().platform_share(),
            platform_percent = %entry.split().platform_percent(),
            "Recorded pending settlement"
        );
        Ok(entry)
    }

    /// Pending entries, oldest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the ledger cannot be read.
    pub async fn pending(&self) -> Result<Vec<PendingSettlementEntry>, SettlementError> {
        self.ledger.list_pending().await
    }

    /// Marks entry `id` as settled.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` or `AlreadyResolved` when the transition is not
    /// possible.
    pub async fn resolve(
        &self,
        id: SettlementEntryId,
    ) -> Result<PendingSettlementEntry, SettlementError> {
        let entry = self.ledger.mark_resolved(id).await?;
        info!(
            entry_id = %entry.id(),
            transaction_reference = %entry.split().transaction_reference(),
            platform_share = %entry.split().platform_share(),
            "Resolved settlement"
        );
        Ok(entry)
    }

    /// Fetches a single entry.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if no entry has this id.
    pub async fn entry(
        &self,
        id: SettlementEntryId,
    ) -> Result<PendingSettlementEntry, SettlementError> {
        self.ledger
            .find(id)
            .await?
            .ok_or(SettlementError::NotFound(id))
    }

    /// One page of the ledger history, newest first.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the ledger cannot be read.
    pub async fn history(
        &self,
        page: &PageRequest,
    ) -> Result<PageResponse<PendingSettlementEntry>, SettlementError> {
        let (items, total) = self.ledger.list_page(page).await?;
        Ok(PageResponse::new(items, page, total))
    }

    /// Reconciliation summary over the whole ledger.
    ///
    /// # Errors
    ///
    /// Returns a storage error if the ledger cannot be read.
    pub async fn report(&self) -> Result<ReportSummary, SettlementError> {
        let entries = self.ledger.entries().await?;
        Ok(build_report(&entries))
    }

    /// Current split configuration.
    #[must_use]
    pub fn split_config(&self) -> SplitConfiguration {
        self.config.current()
    }

    /// Changes the platform percentage for future payments.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if the percentage is out of range or too
    /// precise.
    pub fn update_platform_percent(
        &self,
        percent: Decimal,
    ) -> Result<SplitConfiguration, SettlementError> {
        Ok(self.config.set_platform_percent(percent)?)
    }
}
