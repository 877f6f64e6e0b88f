//! # Supplier Statement (Extrato)
//!
//! Computes what the shop owes a supplier, and validates withdrawal
//! requests against it.
//!
//! ## Computation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  compute_statement(supplier_id, suppliers, items, payments)             │
//! │                                                                         │
//! │  supplier lookup ── miss ──► None  (not a zero statement!)             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  sold items of supplier ──► Σ 50% ──► gross credit ─┐                  │
//! │                         └─► Σ 40% ──► gross cash ───┤                  │
//! │                                                     ▼                  │
//! │  paid entries of supplier ──► per-kind deduction ──► clamp ≥ 0         │
//! │                                                     │                  │
//! │  all entries of supplier ──► date desc ─────────────┴─► statement      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The statement is recomputed on every call and never persisted. Output
//! is canonically ordered, so permuted inputs produce identical statements.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::WithdrawalError;
use crate::money::Money;
use crate::types::{
    ConsignedItem, ConsignmentPolicy, ItemStatus, PayoutEntry, PayoutKind, Supplier,
};

// =============================================================================
// Types
// =============================================================================

/// Supplier share of a single sold item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PayoutSplit {
    pub credit: Money,
    pub cash: Money,
}

impl PayoutSplit {
    /// Splits `sale_price` according to `policy`.
    ///
    /// ## Example
    /// ```rust
    /// use brecho_core::statement::PayoutSplit;
    /// use brecho_core::types::ConsignmentPolicy;
    /// use brecho_core::Money;
    ///
    /// let split = PayoutSplit::of(Money::from_cents(10000), &ConsignmentPolicy::default());
    /// assert_eq!(split.credit.cents(), 5000);
    /// assert_eq!(split.cash.cents(), 4000);
    /// ```
    pub fn of(sale_price: Money, policy: &ConsignmentPolicy) -> Self {
        PayoutSplit {
            credit: sale_price.share(policy.credit_share),
            cash: sale_price.share(policy.cash_share),
        }
    }
}

/// Point-in-time view of a supplier's balances. Derived, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SupplierStatement {
    pub supplier: Supplier,
    /// Sold items of this supplier, ordered by item id.
    pub sold_items: Vec<ConsignedItem>,
    pub gross_credit: Money,
    pub gross_cash: Money,
    /// Available store credit, never negative.
    pub credit_balance: Money,
    /// Available cash, never negative.
    pub cash_balance: Money,
    /// Every entry of this supplier, newest first, undated last.
    pub payment_history: Vec<PayoutEntry>,
}

impl SupplierStatement {
    /// Available balance of the given kind.
    #[inline]
    pub fn balance(&self, kind: PayoutKind) -> Money {
        match kind {
            PayoutKind::Credit => self.credit_balance,
            PayoutKind::Cash => self.cash_balance,
        }
    }

    /// Credit plus cash still owed.
    #[inline]
    pub fn total_owed(&self) -> Money {
        self.credit_balance + self.cash_balance
    }
}

// =============================================================================
// Computation
// =============================================================================

/// Builds the statement of `supplier_id` under the default policy.
///
/// Returns `None` when the supplier does not exist. A supplier with no
/// sales gets `Some` statement with zero balances.
pub fn compute_statement(
    supplier_id: &str,
    suppliers: &[Supplier],
    items: &[ConsignedItem],
    payments: &[PayoutEntry],
) -> Option<SupplierStatement> {
    compute_statement_with(
        supplier_id,
        suppliers,
        items,
        payments,
        &ConsignmentPolicy::default(),
    )
}

/// Same as [`compute_statement`] with explicit share rates.
pub fn compute_statement_with(
    supplier_id: &str,
    suppliers: &[Supplier],
    items: &[ConsignedItem],
    payments: &[PayoutEntry],
    policy: &ConsignmentPolicy,
) -> Option<SupplierStatement> {
    let supplier = suppliers.iter().find(|s| s.id == supplier_id)?;
    Some(statement_for(supplier, items, payments, policy))
}

/// Builds the statement for an already resolved supplier.
pub fn statement_for(
    supplier: &Supplier,
    items: &[ConsignedItem],
    payments: &[PayoutEntry],
    policy: &ConsignmentPolicy,
) -> SupplierStatement {
    let mut sold_items: Vec<ConsignedItem> = items
        .iter()
        .filter(|item| item.supplier_id == supplier.id && item.status == ItemStatus::Sold)
        .cloned()
        .collect();
    sold_items.sort_by(|a, b| a.id.cmp(&b.id));

    let (gross_credit, gross_cash) = sold_items.iter().fold(
        (Money::zero(), Money::zero()),
        |(credit, cash), item| {
            let split = PayoutSplit::of(item.sale_price, policy);
            (credit + split.credit, cash + split.cash)
        },
    );

    let mut payment_history: Vec<PayoutEntry> = payments
        .iter()
        .filter(|entry| entry.supplier_id == supplier.id)
        .cloned()
        .collect();
    payment_history.sort_by(history_order);

    let paid = |kind: PayoutKind| -> Money {
        payment_history
            .iter()
            .filter(|entry| entry.is_paid() && entry.kind == kind)
            .map(|entry| entry.amount)
            .sum()
    };

    SupplierStatement {
        supplier: supplier.clone(),
        credit_balance: (gross_credit - paid(PayoutKind::Credit)).clamp_non_negative(),
        cash_balance: (gross_cash - paid(PayoutKind::Cash)).clamp_non_negative(),
        gross_credit,
        gross_cash,
        sold_items,
        payment_history,
    }
}

/// Newest first, undated last, ties broken by id.
fn history_order(a: &PayoutEntry, b: &PayoutEntry) -> Ordering {
    let by_date = match (a.date, b.date) {
        (Some(x), Some(y)) => y.cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    };
    by_date.then_with(|| a.id.cmp(&b.id))
}

// =============================================================================
// Withdrawal Validation
// =============================================================================

/// Checks a withdrawal ("saque") request against a statement.
///
/// Performs no mutation. On success the caller appends a pending
/// [`PayoutEntry`] for the requested amount and kind.
///
/// ## Example
/// ```rust,ignore
/// // cash balance R$ 100,00
/// validate_withdrawal(Money::from_cents(15000), PayoutKind::Cash, &statement) // InsufficientFunds
/// validate_withdrawal(Money::zero(), PayoutKind::Cash, &statement)            // InvalidAmount
/// validate_withdrawal(Money::from_cents(5000), PayoutKind::Cash, &statement)  // Ok
/// ```
pub fn validate_withdrawal(
    requested: Money,
    kind: PayoutKind,
    statement: &SupplierStatement,
) -> Result<(), WithdrawalError> {
    if !requested.is_positive() {
        return Err(WithdrawalError::InvalidAmount { requested });
    }

    let available = statement.balance(kind);
    if requested > available {
        return Err(WithdrawalError::InsufficientFunds {
            kind,
            requested,
            available,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
