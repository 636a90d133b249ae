//! Reconciliation report.
//!
//! Tells the operator how much platform money is still owed and how many
//! entries are outstanding. Pure aggregation over a slice of entries.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::entry::{PendingSettlementEntry, SettlementStatus};

/// Aggregate view of the ledger.
///
/// Amounts are in minor units. Sums saturate at `i64::MAX`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    /// Sum of platform shares across pending entries.
    pub total_pending_platform_amount: i64,
    /// Number of pending entries.
    pub count_pending: u64,
    /// Number of resolved entries.
    pub count_resolved: u64,
    /// Sum of merchant shares across pending entries.
    pub total_pending_merchant_amount: i64,
    /// Sum of platform shares already transferred.
    pub total_resolved_platform_amount: i64,
    /// Creation time of the oldest pending entry.
    pub oldest_pending_at: Option<DateTime<Utc>>,
}

/// Builds the reconciliation summary for `entries`.
///
/// # Example
///
/// ```
/// use pdv_core::settlement::build_report;
///
/// let summary = build_report(&[]);
/// assert_eq!(summary.total_pending_platform_amount, 0);
/// assert_eq!(summary.count_pending, 0);
/// ```
#[must_use]
pub fn build_report(entries: &[PendingSettlementEntry]) -> ReportSummary {
    entries
        .iter()
        .fold(ReportSummary::default(), |mut summary, entry| {
            let split = entry.split();
            match entry.status() {
                SettlementStatus::Pending => {
                    summary.count_pending += 1;
                    summary.total_pending_platform_amount = summary
                        .total_pending_platform_amount
                        .saturating_add(split.platform_amount());
                    summary.total_pending_merchant_amount = summary
                        .total_pending_merchant_amount
                        .saturating_add(split.merchant_amount());
                    summary.oldest_pending_at = Some(
                        summary
                            .oldest_pending_at
                            .map_or(entry.created_at(), |oldest| oldest.min(entry.created_at())),
                    );
                }
                SettlementStatus::Resolved => {
                    summary.count_resolved += 1;
                    summary.total_resolved_platform_amount = summary
                        .total_resolved_platform_amount
                        .saturating_add(split.platform_amount());
                }
            }
            summary
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::split::SplitResult;
    use chrono::{Duration, TimeZone};
    use pdv_shared::types::{Currency, SettlementEntryId};
    use rust_decimal_macros::dec;

    fn base_time() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 10, 1, 10, 0, 0).unwrap()
    }

    fn entry(id: i64, platform: i64, resolved: bool) -> PendingSettlementEntry {
        // 1% split, so total = platform * 100.
        let total = platform * 100;
        let split = SplitResult::from_parts(
            format!("PIX-{id}"),
            Currency::Brl,
            total,
            total - platform,
            platform,
            dec!(1),
        )
        .unwrap();
        let created_at = base_time() + Duration::minutes(id);
        let mut entry = PendingSettlementEntry::pending(SettlementEntryId::from_raw(id), split, created_at);
        if resolved {
            entry.resolve(created_at + Duration::days(1)).unwrap();
        }
        entry
    }

    #[test]
    fn test_report_counts_and_sums() {
        let entries = [entry(1, 100, false), entry(2, 250, false), entry(3, 500, true)];
        let summary = build_report(&entries);

        assert_eq!(summary.total_pending_platform_amount, 350);
        assert_eq!(summary.count_pending, 2);
        assert_eq!(summary.count_resolved, 1);
        assert_eq!(summary.total_pending_merchant_amount, 9_900 + 24_750);
        assert_eq!(summary.total_resolved_platform_amount, 500);
        assert_eq!(summary.oldest_pending_at, Some(base_time() + Duration::minutes(1)));
    }

    #[test]
    fn test_empty_report_is_zero() {
        assert_eq!(build_report(&[]), ReportSummary::default());
    }

    #[test]
    fn test_resolved_only() {
        let summary = build_report(&[entry(1, 40, true), entry(2, 60, true)]);
        assert_eq!(summary.total_pending_platform_amount, 0);
        assert_eq!(summary.count_pending, 0);
        assert_eq!(summary.count_resolved, 2);
        assert_eq!(summary.total_resolved_platform_amount, 100);
        assert!(summary.oldest_pending_at.is_none());
    }

    #[test]
    fn test_oldest_pending_ignores_order() {
        let entries = [entry(5, 10, false), entry(2, 10, true), entry(3, 10, false)];
        let summary = build_report(&entries);
        assert_eq!(summary.oldest_pending_at, Some(base_time() + Duration::minutes(3)));
    }
}
