//! Append-only pending-settlement ledger.
//!
//! Entries are never deleted. The only mutation is the one-way
//! PENDING -> RESOLVED transition.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use pdv_shared::types::{PageRequest, SettlementEntryId};

use super::entry::PendingSettlementEntry;
use super::error::SettlementError;
use crate::clock::{Clock, SystemClock};
use crate::split::SplitResult;

/// Durable store of computed splits awaiting manual settlement.
///
/// Implementations must make `record` atomic with respect to concurrent
/// callers: two records for the same reference racing each other must not
/// both succeed while the first is still pending.
#[async_trait]
pub trait SettlementLedger: Send + Sync {
    /// Appends `split` as a new `PENDING` entry stamped with the current time.
    ///
    /// Fails with `DuplicateTransaction` if a pending entry already exists
    /// for the same transaction reference.
    async fn record(&self, split: SplitResult) -> Result<PendingSettlementEntry, SettlementError>;

    /// All pending entries, oldest first.
    async fn list_pending(&self) -> Result<Vec<PendingSettlementEntry>, SettlementError>;

    /// Moves entry `id` from `PENDING` to `RESOLVED`.
    ///
    /// Fails with `NotFound` for an unknown id and `AlreadyResolved` when the
    /// entry is not pending.
    async fn mark_resolved(
        &self,
        id: SettlementEntryId,
    ) -> Result<PendingSettlementEntry, SettlementError>;

    /// Looks up a single entry.
    async fn find(
        &self,
        id: SettlementEntryId,
    ) -> Result<Option<PendingSettlementEntry>, SettlementError>;

    /// Every entry ever recorded, in id order.
    async fn entries(&self) -> Result<Vec<PendingSettlementEntry>, SettlementError>;

    /// One page of the full history, newest first, with the total count.
    async fn list_page(
        &self,
        page: &PageRequest,
    ) -> Result<(Vec<PendingSettlementEntry>, u64), SettlementError>;
}

/// Ledger kept in process memory.
///
/// A single mutex covers the duplicate check and the append, so concurrent
/// `record` calls are serialized.
pub struct InMemorySettlementLedger {
    state: Mutex<State>,
    clock: Arc<dyn Clock>,
}

struct State {
    next_id: i64,
    entries: Vec<PendingSettlementEntry>,
}

impl InMemorySettlementLedger {
    /// Creates an empty ledger using wall-clock time.
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    /// Creates an empty ledger using `clock` for timestamps.
    #[must_use]
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 1,
                entries: Vec::new(),
            }),
            clock,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, State>, SettlementError> {
        self.state
            .lock()
            .map_err(|_| SettlementError::storage("ledger lock poisoned"))
    }
}

impl Default for InMemorySettlementLedger {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SettlementLedger for InMemorySettlementLedger {
    async fn record(&self, split: SplitResult) -> Result<PendingSettlementEntry, SettlementError> {
        let mut state = self.lock()?;

        let duplicate = state.entries.iter().any(|e| {
            e.is_pending() && e.split().transaction_reference() == split.transaction_reference()
        });
        if duplicate {
            return Err(SettlementError::DuplicateTransaction(
                split.transaction_reference().to_string(),
            ));
        }

        let id = SettlementEntryId::from_raw(state.next_id);
        state.next_id += 1;
        let entry = PendingSettlementEntry::pending(id, split, self.clock.now());
        state.entries.push(entry.clone());
        Ok(entry)
    }

    async fn list_pending(&self) -> Result<Vec<PendingSettlementEntry>, SettlementError> {
        let state = self.lock()?;
        let mut pending: Vec<_> = state
            .entries
            .iter()
            .filter(|e| e.is_pending())
            .cloned()
            .collect();
        pending.sort_by_key(|e| (e.created_at(), e.id()));
        Ok(pending)
    }

    async fn mark_resolved(
        &self,
        id: SettlementEntryId,
    ) -> Result<PendingSettlementEntry, SettlementError> {
        let now = self.clock.now();
        let mut state = self.lock()?;
        let entry = state
            .entries
            .iter_mut()
            .find(|e| e.id() == id)
            .ok_or(SettlementError::NotFound(id))?;
        entry.resolve(now)?;
        Ok(entry.clone())
    }

    async fn find(
        &self,
        id: SettlementEntryId,
    ) -> Result<Option<PendingSettlementEntry>, SettlementError> {
        let state = self.lock()?;
        Ok(state.entries.iter().find(|e| e.id() == id).cloned())
    }

    async fn entries(&self) -> Result<Vec<PendingSettlementEntry>, SettlementError> {
        Ok(self.lock()?.entries.clone())
    }

    async fn list_page(
        &self,
        page: &PageRequest,
    ) -> Result<(Vec<PendingSettlementEntry>, u64), SettlementError> {
        let state = self.lock()?;
        let total = state.entries.len() as u64;
        let offset = usize::try_from(page.offset()).unwrap_or(usize::MAX);
        let limit = usize::try_from(page.limit()).unwrap_or(usize::MAX);
        let items = state
            .entries
            .iter()
            .rev()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect();
        Ok((items, total))
    }
}
