//! Ledger entry types.

use chrono::{DateTime, Utc};
use pdv_shared::types::SettlementEntryId;
use serde::{Deserialize, Serialize};

use super::error::SettlementError;
use crate::split::SplitResult;

/// Lifecycle state of a ledger entry.
///
/// Entries start `Pending` and move to `Resolved` exactly once, when the
/// platform's share has been transferred.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SettlementStatus {
    /// Platform share still owed.
    Pending,
    /// Platform share transferred.
    Resolved,
}

impl SettlementStatus {
    /// Storage and wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Resolved => "RESOLVED",
        }
    }
}

impl std::fmt::Display for SettlementStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SettlementStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Self::Pending),
            "RESOLVED" => Ok(Self::Resolved),
            _ => Err(format!("Unknown settlement status: {s}")),
        }
    }
}

/// One split recorded in the pending-settlement ledger.
///
/// `resolved_at` is present exactly when the status is `Resolved`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PendingSettlementEntry {
    id: SettlementEntryId,
    split: SplitResult,
    status: SettlementStatus,
    created_at: DateTime<Utc>,
    resolved_at: Option<DateTime<Utc>>,
}

impl PendingSettlementEntry {
    /// Creates a freshly recorded, pending entry.
    #[must_use]
    pub fn pending(id: SettlementEntryId, split: SplitResult, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            split,
            status: SettlementStatus::Pending,
            created_at,
            resolved_at: None,
        }
    }

    /// Rebuilds an entry from stored values.
    ///
    /// # Errors
    ///
    /// Returns a storage error if `resolved_at` does not match the status.
    pub fn restore(
        id: SettlementEntryId,
        split: SplitResult,
        status: SettlementStatus,
        created_at: DateTime<Utc>,
        resolved_at: Option<DateTime<Utc>>,
    ) -> Result<Self, SettlementError> {
        let consistent = match status {
            SettlementStatus::Pending => resolved_at.is_none(),
            SettlementStatus::Resolved => resolved_at.is_some(),
        };
        if !consistent {
            return Err(SettlementError::storage(format!(
                "entry {id} is {status} but resolved_at is {}",
                if resolved_at.is_some() { "set" } else { "missing" }
            )));
        }
        Ok(Self {
            id,
            split,
            status,
            created_at,
            resolved_at,
        })
    }

    /// Transitions this entry to `Resolved`.
    ///
    /// # Errors
    ///
    /// Returns `AlreadyResolved` if the entry is not pending.
    pub fn resolve(&mut self, at: DateTime<Utc>) -> Result<(), SettlementError> {
        if !self.is_pending() {
            return Err(SettlementError::AlreadyResolved(self.id));
        }
        self.status = SettlementStatus::Resolved;
        self.resolved_at = Some(at);
        Ok(())
    }

    /// Entry id.
    #[must_use]
    pub const fn id(&self) -> SettlementEntryId {
        self.id
    }

    /// The recorded split.
    #[must_use]
    pub const fn split(&self) -> &SplitResult {
        &self.split
    }

    /// Current status.
    #[must_use]
    pub const fn status(&self) -> SettlementStatus {
        self.status
    }

    /// When the entry was recorded.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// When the entry was resolved, if it was.
    #[must_use]
    pub const fn resolved_at(&self) -> Option<DateTime<Utc>> {
        self.resolved_at
    }

    /// Returns true while the platform share is still owed.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == SettlementStatus::Pending
    }
}
