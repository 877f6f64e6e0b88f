//! # Garimpo Repository
//!
//! Shop-owned stock bought at bazaars and thrift stores ("garimpo").
//! The sale price is always derived from cost and margin.

use brecho_core::money::Money;
use brecho_core::pricing::garimpo_price;
use brecho_core::types::{GarimpoItem, GarimpoStatus, ItemDetails};
use brecho_core::validation::validate_garimpo_item;
use brecho_core::ValidationError;
use chrono::NaiveDate;
use tracing::info;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};
use crate::store::SharedTables;

/// Highest accepted markup: 1000%.
const MAX_MARGIN_BPS: u32 = 100_000;

/// Form data of a new garimpo item.
#[derive(Debug, Clone)]
pub struct NewGarimpoItem {
    pub purchase_place: String,
    pub purchase_date: NaiveDate,
    pub purchase_cost: Money,
    pub extra_costs: Money,
    pub margin_bps: u32,
    pub stocked_on: NaiveDate,
    pub details: ItemDetails,
}

/// Repository for garimpo items.
#[derive(Debug, Clone)]
pub struct GarimpoRepository {
    tables: SharedTables,
}

impl GarimpoRepository {
    pub(crate) fn new(tables: SharedTables) -> Self {
        GarimpoRepository { tables }
    }

    pub async fn list(&self) -> Vec<GarimpoItem> {
        self.tables.read().await.garimpo.clone()
    }

    /// Items still for sale.
    pub async fn available(&self) -> Vec<GarimpoItem> {
        let tables = self.tables.read().await;
        tables
            .garimpo
            .iter()
            .filter(|g| g.status == GarimpoStatus::Available)
            .cloned()
            .collect()
    }

    pub async fn get(&self, id: &str) -> Option<GarimpoItem> {
        let tables = self.tables.read().await;
        tables.garimpo.iter().find(|g| g.id == id).cloned()
    }

    /// Stocks a new item, pricing it as `(cost + extra) × (1 + margin)`.
    pub async fn create(&self, new: NewGarimpoItem) -> StoreResult<GarimpoItem> {
        validate_garimpo_item(&new.purchase_place, new.purchase_cost, new.extra_costs)?;
        if new.margin_bps > MAX_MARGIN_BPS {
            return Err(ValidationError::OutOfRange {
                field: "margin".to_string(),
                min: 0,
                max: MAX_MARGIN_BPS as i64,
            }
            .into());
        }

        let item = GarimpoItem {
            id: Uuid::new_v4().to_string(),
            sale_price: garimpo_price(new.purchase_cost, new.extra_costs, new.margin_bps),
            purchase_place: new.purchase_place.trim().to_string(),
            purchase_date: new.purchase_date,
            purchase_cost: new.purchase_cost,
            extra_costs: new.extra_costs,
            margin_bps: new.margin_bps,
            status: GarimpoStatus::Available,
            stocked_on: new.stocked_on,
            details: new.details,
        };

        info!(id = %item.id, price = %item.sale_price, "Garimpo item stocked");
        self.tables.write().await.garimpo.push(item.clone());
        Ok(item)
    }

    /// Removes an unsold item from stock.
    pub async fn delete(&self, id: &str) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let index = tables
            .garimpo
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| StoreError::not_found("GarimpoItem", id))?;

        if tables.garimpo[index].status == GarimpoStatus::Sold {
            return Err(StoreError::DeleteForbidden {
                entity: "GarimpoItem".to_string(),
                id: id.to_string(),
            });
        }

        tables.garimpo.remove(index);
        Ok(())
    }
}
