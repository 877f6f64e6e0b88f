//! # Store Handle
//!
//! Owns every table of the back office behind a single async `RwLock`.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         In-Memory Store                                 │
//! │                                                                         │
//! │  StoreConfig::from_env() ← Consignment terms, seed flag                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Store::open(config, today).await                                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────┐                           │
//! │  │       Arc<RwLock<Tables>>                │                           │
//! │  │  suppliers │ consigned │ payouts         │                           │
//! │  │  garimpo   │ sales     │ customers       │                           │
//! │  └─────────────────────────────────────────┘                           │
//! │       │                                                                 │
//! │       │ Cloned handles share the same tables                           │
//! │       ▼                                                                 │
//! │  store.suppliers()    ──► read lock  ──► statement / search            │
//! │  store.sales()        ──► write lock ──► register_sale (all-or-nothing)│
//! │  store.payouts()      ──► write lock ──► request_withdrawal            │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Consistency
//! Readers see either all or none of a write: every multi-table change
//! (a sale, a withdrawal request) runs under one write guard and checks
//! all of its rules before touching any table.

use std::sync::Arc;

use brecho_core::pricing::{dashboard_summary, DashboardInput, DashboardSummary};
use brecho_core::types::{
    ConsignedItem, ConsignmentPolicy, Customer, GarimpoItem, PayoutEntry, Sale, Supplier,
};
use brecho_core::LedgerSnapshot;
use chrono::NaiveDate;
use tokio::sync::RwLock;
use tracing::info;

use crate::config::StoreConfig;
use crate::repository::consignment::ConsignmentRepository;
use crate::repository::customer::CustomerRepository;
use crate::repository::garimpo::GarimpoRepository;
use crate::repository::payout::PayoutRepository;
use crate::repository::sale::SaleRepository;
use crate::repository::supplier::SupplierRepository;
use crate::seed;

// =============================================================================
// Tables
// =============================================================================

/// All records of the back office.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub suppliers: Vec<Supplier>,
    pub consigned: Vec<ConsignedItem>,
    pub payouts: Vec<PayoutEntry>,
    pub garimpo: Vec<GarimpoItem>,
    pub sales: Vec<Sale>,
    pub customers: Vec<Customer>,
}

/// Shared handle to the tables, cloned into every repository.
pub(crate) type SharedTables = Arc<RwLock<Tables>>;

// =============================================================================
// Store
// =============================================================================

/// Main store handle providing repository access.
///
/// Cloning is cheap; clones share the same tables.
///
/// ## Example
/// ```rust
/// use brecho_store::{Store, StoreConfig};
///
/// let store = Store::new(StoreConfig::new());
/// assert_eq!(store.policy().term_months, 3);
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    tables: SharedTables,
    policy: ConsignmentPolicy,
}

impl Store {
    /// Creates an empty store.
    pub fn new(config: StoreConfig) -> Self {
        Store::from_tables(Tables::default(), config.policy)
    }

    /// Creates a store over existing records.
    pub fn from_tables(tables: Tables, policy: ConsignmentPolicy) -> Self {
        Store {
            tables: Arc::new(RwLock::new(tables)),
            policy,
        }
    }

    /// Creates a store, loading the demo data set when the config asks
    /// for it. `today` anchors the demo's relative dates.
    pub async fn open(config: StoreConfig, today: NaiveDate) -> Self {
        let seed_demo = config.seed_demo;
        let store = Store::new(config);

        if seed_demo {
            store.load_demo_data(today).await;
        }

        info!(
            term_months = store.policy.term_months,
            credit_bps = store.policy.credit_share.bps(),
            cash_bps = store.policy.cash_share.bps(),
            seed_demo,
            "Store opened"
        );

        store
    }

    /// Replaces every table with the demo data set.
    pub async fn load_demo_data(&self, today: NaiveDate) {
        let demo = seed::demo_tables(today, &self.policy);
        info!(
            suppliers = demo.suppliers.len(),
            consigned = demo.consigned.len(),
            sales = demo.sales.len(),
            "Loading demo data"
        );
        *self.tables.write().await = demo;
    }

    /// Consignment terms in effect.
    pub fn policy(&self) -> ConsignmentPolicy {
        self.policy
    }

    /// Returns the supplier repository.
    pub fn suppliers(&self) -> SupplierRepository {
        SupplierRepository::new(self.tables.clone(), self.policy)
    }

    /// Returns the consigned item repository.
    pub fn consignments(&self) -> ConsignmentRepository {
        ConsignmentRepository::new(self.tables.clone(), self.policy)
    }

    /// Returns the payout repository.
    pub fn payouts(&self) -> PayoutRepository {
        PayoutRepository::new(self.tables.clone(), self.policy)
    }

    /// Returns the garimpo repository.
    pub fn garimpo(&self) -> GarimpoRepository {
        GarimpoRepository::new(self.tables.clone())
    }

    /// Returns the sale repository.
    pub fn sales(&self) -> SaleRepository {
        SaleRepository::new(self.tables.clone(), self.policy)
    }

    /// Returns the customer repository.
    pub fn customers(&self) -> CustomerRepository {
        CustomerRepository::new(self.tables.clone())
    }

    /// Consistent copy of the ledger the statement engine reads.
    pub async fn snapshot(&self) -> LedgerSnapshot {
        let tables = self.tables.read().await;
        LedgerSnapshot {
            suppliers: tables.suppliers.clone(),
            consigned_items: tables.consigned.clone(),
            payout_entries: tables.payouts.clone(),
            policy: self.policy,
        }
    }

    /// Dashboard counters as of `today`, under the store's policy.
    pub async fn dashboard(&self, today: NaiveDate) -> DashboardSummary {
        let tables = self.tables.read().await;
        let input = DashboardInput {
            garimpo: &tables.garimpo,
            consigned: &tables.consigned,
            sales: &tables.sales,
            suppliers: &tables.suppliers,
            customers: &tables.customers,
        };
        dashboard_summary(&input, today, &self.policy)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use brecho_core::LedgerSource;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 15).unwrap()
    }

    #[tokio::test]
    async fn test_new_store_is_empty() {
        let store = Store::new(StoreConfig::new());
        let snapshot = store.snapshot().await;
        assert!(snapshot.suppliers.is_empty());
        assert!(snapshot.consigned_items.is_empty());
    }

    #[tokio::test]
    async fn test_open_with_seed() {
        let store = Store::open(StoreConfig::new().seed_demo(true), today()).await;
        let snapshot = store.snapshot().await;
        assert_eq!(snapshot.suppliers.len(), 3);
        assert!(snapshot.statement("f1").is_some());
    }

    #[tokio::test]
    async fn test_clones_share_tables() {
        let store = Store::new(StoreConfig::new());
        let other = store.clone();
        other.load_demo_data(today()).await;
        assert_eq!(store.snapshot().await.suppliers.len(), 3);
    }

    #[tokio::test]
    async fn test_snapshot_carries_policy() {
        let policy = ConsignmentPolicy {
            term_months: 2,
            ..ConsignmentPolicy::default()
        };
        let store = Store::new(StoreConfig::new().policy(policy));
        assert_eq!(store.snapshot().await.policy.term_months, 2);
    }

    #[tokio::test]
    async fn test_dashboard_counts_demo_data() {
        let store = Store::open(StoreConfig::new().seed_demo(true), today()).await;
        let summary = store.dashboard(today()).await;
        assert_eq!(summary.garimpo_available, 1);
        assert_eq!(summary.consignments_expiring, 1);
    }

    #[tokio::test]
    async fn test_dashboard_and_list_share_policy_window() {
        use brecho_core::status::StatusFilter;

        let policy = ConsignmentPolicy {
            expiring_window_days: 0,
            ..ConsignmentPolicy::default()
        };
        let store = Store::open(StoreConfig::new().policy(policy).seed_demo(true), today()).await;

        let listed = store
            .consignments()
            .list_filtered(StatusFilter::AboutToExpire, "", today())
            .await
            .unwrap();
        let summary = store.dashboard(today()).await;

        assert!(listed.is_empty());
        assert_eq!(summary.consignments_expiring, 0);
        assert_eq!(summary.consignments_active, 2);
    }
}
