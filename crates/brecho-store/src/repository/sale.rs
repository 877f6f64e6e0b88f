//! # Sale Repository
//!
//! Registers sales across both inventories and reports on them.
//!
//! ## Sale Registration
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       register_sale (one write guard)                   │
//! │                                                                         │
//! │  1. CHECK (nothing written yet)                                        │
//! │     ├── at least one item, no item twice                               │
//! │     ├── consigned: on the rack and not expired                         │
//! │     ├── garimpo: still available                                       │
//! │     └── customer exists, or a walk-in name is given                    │
//! │                                                                         │
//! │  2. FREEZE LINES                                                       │
//! │     ├── garimpo   → cost basis = purchase + extra costs                │
//! │     └── consigned → cost basis = supplier's credit share               │
//! │                                                                         │
//! │  3. APPLY                                                              │
//! │     ├── items → Sold                                                   │
//! │     ├── supplier sales count += 1 per consigned item                   │
//! │     ├── customer purchase history += sale id                           │
//! │     └── sale appended                                                  │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Any failure in step 1 or 2 leaves every table untouched.

use brecho_core::pricing::{
    consigned_line, garimpo_line, sales_report, ReportPeriod, SaleTotals, SalesReport,
};
use brecho_core::types::{
    ConsignmentPolicy, GarimpoStatus, ItemKind, ItemStatus, PaymentMethod, Sale, SaleLine,
};
use brecho_core::{CoreError, ValidationError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::SharedTables;

/// One item picked for a sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaleItemRef {
    pub kind: ItemKind,
    pub item_id: String,
}

impl SaleItemRef {
    pub fn garimpo(id: impl Into<String>) -> Self {
        SaleItemRef {
            kind: ItemKind::Garimpo,
            item_id: id.into(),
        }
    }

    pub fn consigned(id: impl Into<String>) -> Self {
        SaleItemRef {
            kind: ItemKind::Consigned,
            item_id: id.into(),
        }
    }
}

/// Form data of a sale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewSale {
    pub sold_on: NaiveDate,
    /// Registered customer, if any.
    pub customer_id: Option<String>,
    /// Walk-in customer name; ignored when `customer_id` is set.
    pub customer_name: String,
    pub items: Vec<SaleItemRef>,
    pub payment_method: PaymentMethod,
}

/// Repository for sales.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    tables: SharedTables,
    policy: ConsignmentPolicy,
}

impl SaleRepository {
    pub(crate) fn new(tables: SharedTables, policy: ConsignmentPolicy) -> Self {
        SaleRepository { tables, policy }
    }

    /// All sales, newest first.
    pub async fn list(&self) -> Vec<Sale> {
        let mut sales = self.tables.read().await.sales.clone();
        sales.sort_by(|a, b| b.sold_on.cmp(&a.sold_on).then_with(|| a.id.cmp(&b.id)));
        sales
    }

    pub async fn get(&self, id: &str) -> Option<Sale> {
        let tables = self.tables.read().await;
        tables.sales.iter().find(|s| s.id == id).cloned()
    }

    /// Sales of one registered customer, oldest first.
    pub async fn for_customer(&self, customer_id: &str) -> Vec<Sale> {
        let tables = self.tables.read().await;
        let mut sales: Vec<Sale> = tables
            .sales
            .iter()
            .filter(|s| s.customer_id.as_deref() == Some(customer_id))
            .cloned()
            .collect();
        sales.sort_by(|a, b| a.sold_on.cmp(&b.sold_on).then_with(|| a.id.cmp(&b.id)));
        sales
    }

    /// Sales report ("relatório de vendas") for a month, a year or all time.
    pub async fn report(&self, period: ReportPeriod) -> SalesReport {
        let tables = self.tables.read().await;
        sales_report(&tables.sales, period)
    }

    /// Registers a sale. See the module docs for the steps.
    pub async fn register_sale(&self, new: NewSale) -> StoreResult<Sale> {
        let mut tables = self.tables.write().await;

        // ---------------------------------------------------------------------
        // 1-2. Check and freeze lines
        // ---------------------------------------------------------------------

        let customer_name = match &new.customer_id {
            Some(customer_id) => tables
                .customers
                .iter()
                .find(|c| &c.id == customer_id)
                .map(|c| c.name.clone())
                .ok_or_else(|| StoreError::not_found("Customer", customer_id))?,
            None => {
                let name = new.customer_name.trim();
                if name.is_empty() {
                    return Err(ValidationError::Required {
                        field: "customer_name".to_string(),
                    }
                    .into());
                }
                name.to_string()
            }
        };

        let mut lines: Vec<SaleLine> = Vec::with_capacity(new.items.len());
        for pick in &new.items {
            let line = match pick.kind {
                ItemKind::Consigned => {
                    let item = tables
                        .consigned
                        .iter()
                        .find(|i| i.id == pick.item_id)
                        .ok_or_else(|| StoreError::not_found("ConsignedItem", &pick.item_id))?;

                    // Dry run of the transition on a copy.
                    let mut probe = item.clone();
                    probe.mark_sold(new.sold_on)?;

                    consigned_line(item, &self.policy)
                }
                ItemKind::Garimpo => {
                    let item = tables
                        .garimpo
                        .iter()
                        .find(|g| g.id == pick.item_id)
                        .ok_or_else(|| StoreError::not_found("GarimpoItem", &pick.item_id))?;

                    if item.status == GarimpoStatus::Sold {
                        return Err(CoreError::GarimpoAlreadySold(item.id.clone()).into());
                    }

                    garimpo_line(item)
                }
            };
            lines.push(line);
        }

        let totals = SaleTotals::from_lines(&lines)?;

        // ---------------------------------------------------------------------
        // 3. Apply
        // ---------------------------------------------------------------------

        let sale = Sale {
            id: Uuid::new_v4().to_string(),
            sold_on: new.sold_on,
            customer_id: new.customer_id.clone(),
            customer_name,
            lines,
            total: totals.total,
            cost: totals.cost,
            profit: totals.profit,
            payment_method: new.payment_method,
        };

        for line in &sale.lines {
            match line.kind {
                ItemKind::Consigned => {
                    let supplier_id = tables
                        .consigned
                        .iter_mut()
                        .find(|i| i.id == line.item_id)
                        .map(|item| {
                            item.status = ItemStatus::Sold;
                            item.supplier_id.clone()
                        });

                    if let Some(supplier_id) = supplier_id {
                        if let Some(supplier) =
                            tables.suppliers.iter_mut().find(|s| s.id == supplier_id)
                        {
                            supplier.sales_count += 1;
                        }
                    }
                }
                ItemKind::Garimpo => {
                    if let Some(item) = tables.garimpo.iter_mut().find(|g| g.id == line.item_id) {
                        item.status = GarimpoStatus::Sold;
                    }
                }
            }
            debug!(sale_id = %sale.id, item_id = %line.item_id, kind = ?line.kind, "Item sold");
        }

        if let Some(customer_id) = &sale.customer_id {
            if let Some(customer) = tables.customers.iter_mut().find(|c| &c.id == customer_id) {
                customer.purchase_history.push(sale.id.clone());
            }
        }

        info!(
            id = %sale.id,
            items = sale.lines.len(),
            total = %sale.total,
            profit = %sale.profit,
            "Sale registered"
        );

        tables.sales.push(sale.clone());
        Ok(sale)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Store, StoreConfig};
    use brecho_core::Money;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 15).unwrap()
    }

    async fn demo_store() -> Store {
        Store::open(StoreConfig::new().seed_demo(true), today()).await
    }

    fn new_sale(items: Vec<SaleItemRef>) -> NewSale {
        NewSale {
            sold_on: today(),
            customer_id: Some("c2".to_string()),
            customer_name: String::new(),
            items,
            payment_method: PaymentMethod::Pix,
        }
    }

    #[tokio::test]
    async fn test_register_mixed_sale() {
        let store = demo_store().await;
        let sale = store
            .sales()
            .register_sale(new_sale(vec![
                SaleItemRef::consigned("ic1"),
                SaleItemRef::garimpo("g1"),
            ]))
            .await
            .unwrap();

        // R$ 80,00 consigned (cost 40,00) + R$ 48,00 garimpo (cost 30,00)
        assert_eq!(sale.total.cents(), 12800);
        assert_eq!(sale.cost.cents(), 7000);
        assert_eq!(sale.profit.cents(), 5800);
        assert_eq!(sale.customer_name, "Cliente Novo");

        let ic1 = store.consignments().get("ic1").await.unwrap();
        assert_eq!(ic1.status, ItemStatus::Sold);
        let g1 = store.garimpo().get("g1").await.unwrap();
        assert_eq!(g1.status, GarimpoStatus::Sold);

        let maria = store.suppliers().get("f1").await.unwrap();
        assert_eq!(maria.sales_count, 16);

        let c2 = store.customers().get("c2").await.unwrap();
        assert_eq!(c2.purchase_history, vec![sale.id.clone()]);
    }

    #[tokio::test]
    async fn test_sale_feeds_statement() {
        let store = demo_store().await;
        store
            .sales()
            .register_sale(new_sale(vec![SaleItemRef::consigned("ic1")]))
            .await
            .unwrap();

        let statement = store.suppliers().statement("f1").await.unwrap();
        assert_eq!(statement.credit_balance.cents(), 3000 + 4000);
        assert_eq!(statement.cash_balance.cents(), 4000 + 3200);
    }

    #[tokio::test]
    async fn test_failed_sale_changes_nothing() {
        let store = demo_store().await;

        // ic2 expired on 2024-09-10
        let err = store
            .sales()
            .register_sale(new_sale(vec![
                SaleItemRef::garimpo("g1"),
                SaleItemRef::consigned("ic2"),
            ]))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::ItemExpired { .. })));

        let g1 = store.garimpo().get("g1").await.unwrap();
        assert_eq!(g1.status, GarimpoStatus::Available);
        assert_eq!(store.sales().list().await.len(), 3);
    }

    #[tokio::test]
    async fn test_rejections() {
        let store = demo_store().await;
        let sales = store.sales();

        assert!(matches!(
            sales.register_sale(new_sale(vec![])).await,
            Err(StoreError::Core(CoreError::EmptySale))
        ));
        assert!(matches!(
            sales
                .register_sale(new_sale(vec![SaleItemRef::garimpo("g2")]))
                .await,
            Err(StoreError::Core(CoreError::GarimpoAlreadySold(_)))
        ));
        assert!(matches!(
            sales
                .register_sale(new_sale(vec![
                    SaleItemRef::garimpo("g1"),
                    SaleItemRef::garimpo("g1"),
                ]))
                .await,
            Err(StoreError::Core(CoreError::DuplicateSaleLine(_)))
        ));
        assert!(matches!(
            sales
                .register_sale(new_sale(vec![SaleItemRef::consigned("ic5")]))
                .await,
            Err(StoreError::Core(CoreError::InvalidItemTransition { .. }))
        ));
        assert!(matches!(
            sales
                .register_sale(new_sale(vec![SaleItemRef::consigned("nope")]))
                .await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_walk_in_customer() {
        let store = demo_store().await;
        let mut walk_in = new_sale(vec![SaleItemRef::garimpo("g1")]);
        walk_in.customer_id = None;
        walk_in.customer_name = "  ".to_string();

        assert!(matches!(
            store.sales().register_sale(walk_in.clone()).await,
            Err(StoreError::Core(CoreError::Validation(_)))
        ));

        walk_in.customer_name = "Dona Rosa".to_string();
        let sale = store.sales().register_sale(walk_in).await.unwrap();
        assert_eq!(sale.customer_name, "Dona Rosa");
        assert_eq!(sale.customer_id, None);
    }

    #[tokio::test]
    async fn test_report_and_listing() {
        let store = demo_store().await;
        let sales = store.sales();

        let august = sales
            .report(ReportPeriod {
                month: Some(8),
                year: Some(2024),
            })
            .await;
        assert_eq!(august.sales_count, 2);
        assert_eq!(august.revenue, Money::from_cents(22000));

        let listed = sales.list().await;
        assert_eq!(listed[0].id, "v-def");
        assert_eq!(sales.for_customer("c1").await.len(), 1);
    }
}
