//! # Ledger Source
//!
//! The read interface the engine consumes. Whatever owns the data (the
//! in-memory store, a database, a test fixture) hands the engine a
//! consistent view through this trait; the engine never reaches into
//! global state.

use chrono::NaiveDate;

use crate::statement::{compute_statement_with, SupplierStatement};
use crate::status::display_status_with;
use crate::types::{ConsignedItem, ConsignmentPolicy, DisplayStatus, PayoutEntry, Supplier};

/// Read access to suppliers, consigned items and payout entries.
pub trait LedgerSource {
    fn suppliers(&self) -> &[Supplier];
    fn consigned_items(&self) -> &[ConsignedItem];
    fn payout_entries(&self) -> &[PayoutEntry];

    /// Terms the data was recorded under.
    fn policy(&self) -> ConsignmentPolicy {
        ConsignmentPolicy::default()
    }

    fn find_supplier(&self, supplier_id: &str) -> Option<&Supplier> {
        self.suppliers().iter().find(|s| s.id == supplier_id)
    }

    fn find_item(&self, item_id: &str) -> Option<&ConsignedItem> {
        self.consigned_items().iter().find(|i| i.id == item_id)
    }

    /// Statement of `supplier_id`, or `None` when the supplier is unknown.
    fn statement(&self, supplier_id: &str) -> Option<SupplierStatement> {
        compute_statement_with(
            supplier_id,
            self.suppliers(),
            self.consigned_items(),
            self.payout_entries(),
            &self.policy(),
        )
    }

    /// Display status of `item_id`, or `None` when the item is unknown.
    fn item_status(&self, item_id: &str, today: NaiveDate) -> Option<DisplayStatus> {
        let policy = self.policy();
        self.find_item(item_id)
            .map(|item| display_status_with(item, today, &policy))
    }
}

/// An owned, consistent copy of the ledger.
#[derive(Debug, Clone, Default)]
pub struct LedgerSnapshot {
    pub suppliers: Vec<Supplier>,
    pub consigned_items: Vec<ConsignedItem>,
    pub payout_entries: Vec<PayoutEntry>,
    pub policy: ConsignmentPolicy,
}

impl LedgerSource for LedgerSnapshot {
    fn suppliers(&self) -> &[Supplier] {
        &self.suppliers
    }

    fn consigned_items(&self) -> &[ConsignedItem] {
        &self.consigned_items
    }

    fn payout_entries(&self) -> &[PayoutEntry] {
        &self.payout_entries
    }

    fn policy(&self) -> ConsignmentPolicy {
        self.policy
    }
}
