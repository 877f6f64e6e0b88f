//! # Consignment Repository
//!
//! Consigned items ("itens consignados") and their status changes.
//!
//! ## Item Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Consigned Item Lifecycle                          │
//! │                                                                         │
//! │  1. CREATE                                                             │
//! │     └── create() → Available, expires start + term, code "MDS007"      │
//! │                                                                         │
//! │  2. ON THE RACK                                                        │
//! │     └── shown as Disponível → Próximo a Expirar → Expirado by date     │
//! │                                                                         │
//! │  3. LEAVE THE RACK (one of)                                            │
//! │     ├── SaleRepository::register_sale() → Sold (not once expired)      │
//! │     └── mark_returned() → Returned (back to the supplier)              │
//! │                                                                         │
//! │  4. (OPTIONAL) DELETE                                                  │
//! │     └── delete() → any item except sold ones                           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use brecho_core::format::supplier_item_code;
use brecho_core::money::Money;
use brecho_core::status::{display_status_with, matches_search, StatusFilter};
use brecho_core::types::{ConsignedItem, ConsignmentPolicy, DisplayStatus, ItemDetails, ItemStatus};
use brecho_core::CoreError;
use brecho_core::validation::{validate_consigned_item, validate_search_query};
use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::SharedTables;

/// A consigned item with the status the operator sees.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ItemView {
    #[serde(flatten)]
    pub item: ConsignedItem,
    pub display_status: DisplayStatus,
    pub supplier_name: Option<String>,
}

/// Repository for consigned item operations.
#[derive(Debug, Clone)]
pub struct ConsignmentRepository {
    tables: SharedTables,
    policy: ConsignmentPolicy,
}

impl ConsignmentRepository {
    pub(crate) fn new(tables: SharedTables, policy: ConsignmentPolicy) -> Self {
        ConsignmentRepository { tables, policy }
    }

    /// All consigned items.
    pub async fn list(&self) -> Vec<ConsignedItem> {
        self.tables.read().await.consigned.clone()
    }

    /// Gets an item by ID.
    pub async fn get(&self, id: &str) -> Option<ConsignedItem> {
        let tables = self.tables.read().await;
        tables.consigned.iter().find(|i| i.id == id).cloned()
    }

    /// Items of one supplier.
    pub async fn for_supplier(&self, supplier_id: &str) -> Vec<ConsignedItem> {
        let tables = self.tables.read().await;
        tables
            .consigned
            .iter()
            .filter(|i| i.supplier_id == supplier_id)
            .cloned()
            .collect()
    }

    /// Receives a new item from a supplier.
    ///
    /// ## What This Does
    /// 1. Validates supplier id and price
    /// 2. Fixes `expiration_date = start + term`
    /// 3. Assigns the next label code of that supplier ("MDS003")
    /// 4. Generates a UUID
    pub async fn create(
        &self,
        supplier_id: &str,
        start: NaiveDate,
        sale_price: Money,
        details: ItemDetails,
    ) -> StoreResult<ConsignedItem> {
        validate_consigned_item(supplier_id, sale_price)?;

        let mut tables = self.tables.write().await;

        let supplier_name = tables
            .suppliers
            .iter()
            .find(|s| s.id == supplier_id)
            .map(|s| s.name.clone())
            .ok_or_else(|| StoreError::not_found("Supplier", supplier_id))?;

        let code = supplier_item_code(&supplier_name, next_sequence(&tables.consigned, supplier_id));

        let item = ConsignedItem::new(
            Uuid::new_v4().to_string(),
            supplier_id,
            code,
            start,
            sale_price,
            &self.policy,
        )
        .with_details(details);

        info!(
            id = %item.id,
            supplier_id,
            code = %item.supplier_code,
            expires = %item.expiration_date,
            "Consigned item received"
        );

        tables.consigned.push(item.clone());
        Ok(item)
    }

    /// Edits the descriptive attributes and price of an item still on the rack.
    pub async fn update_details(
        &self,
        id: &str,
        sale_price: Money,
        details: ItemDetails,
    ) -> StoreResult<ConsignedItem> {
        let mut tables = self.tables.write().await;
        let item = find_mut(&mut tables.consigned, id)?;

        validate_consigned_item(&item.supplier_id, sale_price)?;
        if item.status.is_terminal() {
            return Err(CoreError::InvalidItemTransition {
                item_id: item.id.clone(),
                current: item.status,
                target: ItemStatus::Available,
            }
            .into());
        }

        debug!(id, "Updating consigned item");
        item.sale_price = sale_price;
        item.details = details;
        Ok(item.clone())
    }

    /// Marks an item as sold outside of a registered sale. The supplier's
    /// sale counter moves with it, as in `register_sale`.
    pub async fn mark_sold(&self, id: &str, today: NaiveDate) -> StoreResult<ConsignedItem> {
        let mut guard = self.tables.write().await;
        let tables = &mut *guard;
        let item = find_mut(&mut tables.consigned, id)?;

        item.mark_sold(today)?;
        if let Some(supplier) = tables.suppliers.iter_mut().find(|s| s.id == item.supplier_id) {
            supplier.sales_count += 1;
        }

        info!(id, supplier_id = %item.supplier_id, "Consigned item sold");
        Ok(item.clone())
    }

    /// Hands an item back to its supplier.
    pub async fn mark_returned(&self, id: &str) -> StoreResult<ConsignedItem> {
        let mut tables = self.tables.write().await;
        let item = find_mut(&mut tables.consigned, id)?;

        item.mark_returned()?;
        info!(id, "Consigned item returned");
        Ok(item.clone())
    }

    /// Deletes an item. Sold items stay on record for the statement.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let index = tables
            .consigned
            .iter()
            .position(|i| i.id == id)
            .ok_or_else(|| StoreError::not_found("ConsignedItem", id))?;

        if !tables.consigned[index].can_delete() {
            return Err(StoreError::DeleteForbidden {
                entity: "ConsignedItem".to_string(),
                id: id.to_string(),
            });
        }

        info!(id, "Deleting consigned item");
        tables.consigned.remove(index);
        Ok(())
    }

    /// The consignment list: status filter plus free-text search over
    /// brand, category, label code and supplier name.
    pub async fn list_filtered(
        &self,
        filter: StatusFilter,
        query: &str,
        today: NaiveDate,
    ) -> StoreResult<Vec<ItemView>> {
        let query = validate_search_query(query)?;
        let tables = self.tables.read().await;
        let names: HashMap<&str, &str> = tables
            .suppliers
            .iter()
            .map(|s| (s.id.as_str(), s.name.as_str()))
            .collect();

        let views: Vec<ItemView> = tables
            .consigned
            .iter()
            .filter_map(|item| {
                let supplier_name = names
                    .get(item.supplier_id.as_str())
                    .map(|name| name.to_string());

                let shown = display_status_with(item, today, &self.policy);
                let wanted = filter.accepts(shown)
                    && matches_search(item, supplier_name.as_deref(), &query);

                wanted.then(|| ItemView {
                    item: item.clone(),
                    display_status: shown,
                    supplier_name,
                })
            })
            .collect();

        debug!(?filter, query = %query, count = views.len(), "Filtered consignments");
        Ok(views)
    }
}

/// One past the highest label number the supplier already has.
fn next_sequence(items: &[ConsignedItem], supplier_id: &str) -> u32 {
    items
        .iter()
        .filter(|i| i.supplier_id == supplier_id)
        .filter_map(|i| {
            let digits: String = i
                .supplier_code
                .chars()
                .rev()
                .take_while(char::is_ascii_digit)
                .collect();
            digits.chars().rev().collect::<String>().parse::<u32>().ok()
        })
        .max()
        .unwrap_or(0)
        + 1
}

fn find_mut<'a>(items: &'a mut [ConsignedItem], id: &str) -> StoreResult<&'a mut ConsignedItem> {
    items
        .iter_mut()
        .find(|i| i.id == id)
        .ok_or_else(|| StoreError::not_found("ConsignedItem", id))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Store, StoreConfig};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 15).unwrap()
    }

    async fn demo_store() -> Store {
        Store::open(StoreConfig::new().seed_demo(true), today()).await
    }

    #[tokio::test]
    async fn test_create_assigns_code_and_expiry() {
        let store = demo_store().await;
        let item = store
            .consignments()
            .create("f1", today(), Money::from_cents(6500), ItemDetails::default())
            .await
            .unwrap();

        // Maria's labels go up to MDS006
        assert_eq!(item.supplier_code, "MDS007");
        assert_eq!(item.expiration_date, NaiveDate::from_ymd_opt(2024, 12, 15).unwrap());
        assert_eq!(item.status, ItemStatus::Available);
        assert_eq!(store.consignments().for_supplier("f1").await.len(), 5);
    }

    #[tokio::test]
    async fn test_create_requires_known_supplier() {
        let store = demo_store().await;
        let err = store
            .consignments()
            .create("f9", today(), Money::from_cents(1000), ItemDetails::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        let err = store
            .consignments()
            .create("f1", today(), Money::from_cents(-1), ItemDetails::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::Validation(_))));
    }

    #[tokio::test]
    async fn test_mark_returned_then_sold_fails() {
        let store = demo_store().await;
        let repo = store.consignments();

        repo.mark_returned("ic3").await.unwrap();
        let err = repo.mark_sold("ic3", today()).await.unwrap_err();
        assert!(matches!(
            err,
            StoreError::Core(CoreError::InvalidItemTransition { .. })
        ));
    }

    #[tokio::test]
    async fn test_mark_sold_counts_for_supplier() {
        let store = demo_store().await;
        let before = store.suppliers().get("f1").await.unwrap().sales_count;

        let sold = store.consignments().mark_sold("ic1", today()).await.unwrap();
        assert_eq!(sold.status, ItemStatus::Sold);

        let maria = store.suppliers().get("f1").await.unwrap();
        assert_eq!(maria.sales_count, before + 1);

        // A refused sale leaves the counter alone
        assert!(store.consignments().mark_sold("ic1", today()).await.is_err());
        assert_eq!(store.suppliers().get("f1").await.unwrap().sales_count, before + 1);
    }

    #[tokio::test]
    async fn test_expired_item_cannot_be_sold_but_can_return() {
        let store = demo_store().await;
        let repo = store.consignments();

        let err = repo.mark_sold("ic2", today()).await.unwrap_err();
        assert!(matches!(err, StoreError::Core(CoreError::ItemExpired { .. })));

        let returned = repo.mark_returned("ic2").await.unwrap();
        assert_eq!(returned.status, ItemStatus::Returned);
    }

    #[tokio::test]
    async fn test_delete_rules() {
        let store = demo_store().await;
        let repo = store.consignments();

        let err = repo.delete("ic5").await.unwrap_err();
        assert!(matches!(err, StoreError::DeleteForbidden { .. }));

        repo.delete("ic6").await.unwrap();
        assert!(repo.get("ic6").await.is_none());
        assert!(matches!(
            repo.delete("ic6").await,
            Err(StoreError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_details() {
        let store = demo_store().await;
        let repo = store.consignments();

        let item = repo
            .update_details("ic3", Money::from_cents(3500), ItemDetails::default())
            .await
            .unwrap();
        assert_eq!(item.sale_price.cents(), 3500);

        assert!(repo
            .update_details("ic5", Money::from_cents(1), ItemDetails::default())
            .await
            .is_err());
    }

    #[tokio::test]
    async fn test_list_filtered() {
        let store = demo_store().await;
        let repo = store.consignments();

        let expiring = repo
            .list_filtered(StatusFilter::AboutToExpire, "", today())
            .await
            .unwrap();
        assert_eq!(expiring.len(), 1);
        assert_eq!(expiring[0].item.id, "ic1");
        assert_eq!(expiring[0].supplier_name.as_deref(), Some("Maria da Silva"));

        let by_supplier = repo
            .list_filtered(StatusFilter::All, "joão", today())
            .await
            .unwrap();
        assert_eq!(by_supplier.len(), 2);

        let sold_bags = repo
            .list_filtered(StatusFilter::Sold, "bolsa", today())
            .await
            .unwrap();
        assert_eq!(sold_bags.len(), 1);
        assert_eq!(sold_bags[0].display_status, DisplayStatus::Sold);
    }

    #[tokio::test]
    async fn test_window_follows_store_policy() {
        let policy = ConsignmentPolicy {
            expiring_window_days: 5,
            ..ConsignmentPolicy::default()
        };
        let store = Store::new(StoreConfig::new().policy(policy));
        store.load_demo_data(today()).await;

        let expiring = store
            .consignments()
            .list_filtered(StatusFilter::AboutToExpire, "", today())
            .await
            .unwrap();
        assert!(expiring.is_empty());
    }
}
