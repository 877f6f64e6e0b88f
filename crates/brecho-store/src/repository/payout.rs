//! # Payout Repository
//!
//! Payout entries ("pagamentos") owed to suppliers: withdrawal requests and
//! their settlement.
//!
//! ## Withdrawal Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Withdrawal ("saque")                              │
//! │                                                                         │
//! │  request_withdrawal(f1, R$ 30,00, Credit, today)                       │
//! │     │                                                                   │
//! │     ├── write guard taken                                              │
//! │     ├── statement rebuilt from the guarded tables                      │
//! │     ├── validate_withdrawal(requested, kind, &statement)               │
//! │     │      └── Err → nothing written                                   │
//! │     └── PayoutEntry { Pending, date: today } appended                  │
//! │                                                                         │
//! │  mark_paid(entry, today)                                               │
//! │     └── Pending → Paid; the balance of that kind drops by the amount   │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Pending entries do not reduce the balance. Two requests for the full
//! balance are both accepted; only what is paid is deducted.

use brecho_core::money::Money;
use brecho_core::statement::{statement_for, validate_withdrawal};
use brecho_core::types::{ConsignmentPolicy, PayoutEntry, PayoutKind, PayoutStatus};
use brecho_core::CoreError;
use chrono::NaiveDate;
use tracing::{info, warn};

use crate::error::{StoreError, StoreResult};
use crate::store::SharedTables;

/// Repository for payout entries.
#[derive(Debug, Clone)]
pub struct PayoutRepository {
    tables: SharedTables,
    policy: ConsignmentPolicy,
}

impl PayoutRepository {
    pub(crate) fn new(tables: SharedTables, policy: ConsignmentPolicy) -> Self {
        PayoutRepository { tables, policy }
    }

    /// Entries of one supplier, in insertion order.
    pub async fn list_for(&self, supplier_id: &str) -> Vec<PayoutEntry> {
        let tables = self.tables.read().await;
        tables
            .payouts
            .iter()
            .filter(|p| p.supplier_id == supplier_id)
            .cloned()
            .collect()
    }

    /// Gets an entry by ID.
    pub async fn get(&self, id: &str) -> Option<PayoutEntry> {
        let tables = self.tables.read().await;
        tables.payouts.iter().find(|p| p.id == id).cloned()
    }

    /// Records an entry as-is (imports, manual adjustments).
    pub async fn insert(&self, entry: PayoutEntry) -> StoreResult<()> {
        let mut tables = self.tables.write().await;

        if !tables.suppliers.iter().any(|s| s.id == entry.supplier_id) {
            return Err(StoreError::not_found("Supplier", &entry.supplier_id));
        }
        if tables.payouts.iter().any(|p| p.id == entry.id) {
            return Err(StoreError::duplicate("id", &entry.id));
        }

        info!(id = %entry.id, supplier_id = %entry.supplier_id, amount = %entry.amount, "Recording payout entry");
        tables.payouts.push(entry);
        Ok(())
    }

    /// Requests a withdrawal of `amount` from the supplier's `kind` balance.
    ///
    /// ## Returns
    /// * `Ok(PayoutEntry)` - The pending entry that was appended
    /// * `Err(StoreError::NotFound)` - Unknown supplier
    /// * `Err(StoreError::Core(Withdrawal(..)))` - Non-positive amount or
    ///   insufficient balance; nothing is written
    pub async fn request_withdrawal(
        &self,
        supplier_id: &str,
        amount: Money,
        kind: PayoutKind,
        today: NaiveDate,
    ) -> StoreResult<PayoutEntry> {
        let mut tables = self.tables.write().await;

        let supplier = tables
            .suppliers
            .iter()
            .find(|s| s.id == supplier_id)
            .ok_or_else(|| StoreError::not_found("Supplier", supplier_id))?;

        let statement = statement_for(supplier, &tables.consigned, &tables.payouts, &self.policy);

        if let Err(err) = validate_withdrawal(amount, kind, &statement) {
            warn!(supplier_id, %amount, ?kind, error = %err, "Withdrawal rejected");
            return Err(err.into());
        }

        let entry = PayoutEntry::pending_withdrawal(supplier_id, amount, kind, today);
        info!(
            id = %entry.id,
            supplier_id,
            %amount,
            ?kind,
            "Withdrawal requested"
        );

        tables.payouts.push(entry.clone());
        Ok(entry)
    }

    /// Settles a pending entry on `today`.
    pub async fn mark_paid(&self, id: &str, today: NaiveDate) -> StoreResult<PayoutEntry> {
        let mut tables = self.tables.write().await;
        let entry = tables
            .payouts
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("PayoutEntry", id))?;

        if entry.is_paid() {
            return Err(CoreError::PayoutAlreadyPaid(id.to_string()).into());
        }

        entry.status = PayoutStatus::Paid;
        entry.date = Some(today);
        info!(id, amount = %entry.amount, "Payout settled");
        Ok(entry.clone())
    }

    /// Drops a pending entry (request withdrawn by the supplier).
    pub async fn cancel(&self, id: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let index = tables
            .payouts
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::not_found("PayoutEntry", id))?;

        if tables.payouts[index].is_paid() {
            return Err(CoreError::PayoutAlreadyPaid(id.to_string()).into());
        }

        info!(id, "Pending payout cancelled");
        tables.payouts.remove(index);
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Store, StoreConfig};
    use brecho_core::WithdrawalError;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 15).unwrap()
    }

    async fn demo_store() -> Store {
        Store::open(StoreConfig::new().seed_demo(true), today()).await
    }

    #[tokio::test]
    async fn test_request_within_balance() {
        let store = demo_store().await;
        let entry = store
            .payouts()
            .request_withdrawal("f1", Money::from_cents(3000), PayoutKind::Credit, today())
            .await
            .unwrap();

        assert_eq!(entry.status, PayoutStatus::Pending);
        assert_eq!(entry.date, Some(today()));
        assert_eq!(entry.sale_id, None);
        assert_eq!(store.payouts().list_for("f1").await.len(), 3);

        // Pending requests leave the balance untouched
        let statement = store.suppliers().statement("f1").await.unwrap();
        assert_eq!(statement.credit_balance.cents(), 3000);
        assert_eq!(statement.payment_history[0].id, entry.id);
    }

    #[tokio::test]
    async fn test_request_over_balance_writes_nothing() {
        let store = demo_store().await;
        let err = store
            .payouts()
            .request_withdrawal("f1", Money::from_cents(3001), PayoutKind::Credit, today())
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            StoreError::Core(CoreError::Withdrawal(WithdrawalError::InsufficientFunds {
                kind: PayoutKind::Credit,
                ..
            }))
        ));
        assert_eq!(store.payouts().list_for("f1").await.len(), 2);
    }

    #[tokio::test]
    async fn test_request_non_positive_amount() {
        let store = demo_store().await;
        for cents in [0, -100] {
            let err = store
                .payouts()
                .request_withdrawal("f1", Money::from_cents(cents), PayoutKind::Cash, today())
                .await
                .unwrap_err();
            assert!(matches!(
                err,
                StoreError::Core(CoreError::Withdrawal(WithdrawalError::InvalidAmount { .. }))
            ));
        }
    }

    #[tokio::test]
    async fn test_request_unknown_supplier() {
        let store = demo_store().await;
        let err = store
            .payouts()
            .request_withdrawal("f9", Money::from_cents(100), PayoutKind::Cash, today())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_mark_paid_reduces_balance() {
        let store = demo_store().await;
        let repo = store.payouts();

        let paid = repo.mark_paid("p2", today()).await.unwrap();
        assert_eq!(paid.date, Some(today()));

        let statement = store.suppliers().statement("f1").await.unwrap();
        assert_eq!(statement.cash_balance, Money::zero());

        assert!(matches!(
            repo.mark_paid("p2", today()).await,
            Err(StoreError::Core(CoreError::PayoutAlreadyPaid(_)))
        ));
    }

    #[tokio::test]
    async fn test_cancel_pending_only() {
        let store = demo_store().await;
        let repo = store.payouts();

        assert!(repo.cancel("p1").await.is_err());
        repo.cancel("p2").await.unwrap();
        assert!(repo.get("p2").await.is_none());
    }

    #[tokio::test]
    async fn test_insert_checks_supplier_and_id() {
        let store = demo_store().await;
        let repo = store.payouts();

        let mut entry =
            PayoutEntry::pending_withdrawal("f2", Money::from_cents(1000), PayoutKind::Cash, today());
        entry.id = "p1".to_string();
        assert!(matches!(
            repo.insert(entry.clone()).await,
            Err(StoreError::Duplicate { .. })
        ));

        entry.id = "p3".to_string();
        entry.supplier_id = "f9".to_string();
        assert!(matches!(
            repo.insert(entry).await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_concurrent_requests_are_serialized() {
        let store = demo_store().await;
        let mut handles = Vec::new();

        for _ in 0..8 {
            let repo = store.payouts();
            handles.push(tokio::spawn(async move {
                repo.request_withdrawal("f1", Money::from_cents(1000), PayoutKind::Cash, today())
                    .await
            }));
        }

        for handle in handles {
            assert!(handle.await.unwrap().is_ok());
        }
        assert_eq!(store.payouts().list_for("f1").await.len(), 10);
    }
}
