//! # Domain Types
//!
//! Core domain types used throughout the brechó back office.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Supplier     │◄──│  ConsignedItem  │   │   GarimpoItem   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  supplier_id    │   │  purchase cost  │       │
//! │  │  cpf, address   │   │  start/expires  │   │  margin         │       │
//! │  │  sales_count    │   │  sale_price     │   │  sale_price     │       │
//! │  └────────┬────────┘   │  ItemStatus     │   └─────────────────┘       │
//! │           │            └─────────────────┘                              │
//! │  ┌────────▼────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │  PayoutEntry    │   │      Sale       │──►│    Customer     │       │
//! │  │  kind: credit/  │   │  lines, totals  │   │  purchase hist. │       │
//! │  │        cash     │   │  PaymentMethod  │   └─────────────────┘       │
//! │  │  pending/paid   │   └─────────────────┘                              │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Dates are day-granular [`NaiveDate`]s: every consignment rule compares
//! calendar days, never times of day.

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Share Rate
// =============================================================================

/// A percentage represented in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%. 5000 bps = 50% (store credit share),
/// 4000 bps = 40% (cash share). Integers keep the split exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShareRate(u32);

impl ShareRate {
    /// Creates a rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        ShareRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }
}

// =============================================================================
// Consignment Policy
// =============================================================================

/// The shop's consignment terms.
///
/// `Default` carries the rules the shop operates with today: three-month
/// consignment, a 30-day "about to expire" warning, and a 50% store credit /
/// 40% cash split of each sale (the remaining 10% is the store's margin).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConsignmentPolicy {
    /// Length of the consignment period, in calendar months.
    pub term_months: u32,
    /// Items expiring within this many days are flagged.
    pub expiring_window_days: i64,
    /// Supplier share paid as store credit.
    pub credit_share: ShareRate,
    /// Supplier share paid in cash.
    pub cash_share: ShareRate,
}

impl ConsignmentPolicy {
    /// Expiration date for a consignment starting on `start`.
    ///
    /// ## Example
    /// ```rust
    /// use brecho_core::types::ConsignmentPolicy;
    /// use chrono::NaiveDate;
    ///
    /// let start = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
    /// let expires = ConsignmentPolicy::default().expiration_for(start);
    /// assert_eq!(expires, NaiveDate::from_ymd_opt(2024, 10, 15).unwrap());
    /// ```
    pub fn expiration_for(&self, start: NaiveDate) -> NaiveDate {
        start
            .checked_add_months(Months::new(self.term_months))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl Default for ConsignmentPolicy {
    fn default() -> Self {
        ConsignmentPolicy {
            term_months: 3,
            expiring_window_days: 30,
            credit_share: ShareRate::from_bps(5000),
            cash_share: ShareRate::from_bps(4000),
        }
    }
}

// =============================================================================
// Shared Attributes
// =============================================================================

/// Descriptive attributes of a clothing item. No invariants.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ItemDetails {
    pub brand: Option<String>,
    pub size: Option<String>,
    pub category: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub photos: Vec<String>,
}

/// Postal address (Brazilian format).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Address {
    pub street: String,
    pub number: String,
    pub complement: Option<String>,
    pub district: String,
    pub city: String,
    /// Two-letter state code (UF), e.g. "SP".
    pub state: String,
    /// CEP, digits only.
    pub cep: String,
}

// =============================================================================
// Supplier
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum SupplierStatus {
    #[default]
    Active,
    Inactive,
}

/// A person who leaves items with the shop on consignment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Supplier {
    pub id: String,
    pub name: String,
    /// CPF, digits only.
    pub cpf: String,
    /// Phone, digits only.
    pub phone: String,
    pub email: Option<String>,
    pub address: Address,
    #[serde(default)]
    pub preferred_sizes: Vec<String>,
    /// Number of consigned items sold so far.
    pub sales_count: u32,
    pub status: SupplierStatus,
    #[ts(as = "String")]
    pub registered_on: NaiveDate,
    /// Portal login hash. Never sent to the dashboard.
    #[serde(default, skip_serializing)]
    #[ts(skip)]
    pub password_hash: Option<String>,
}

// =============================================================================
// Consigned Item
// =============================================================================

/// The stored status flag of a consigned item.
///
/// Only `Sold` and `Returned` are ever written by user actions. `Expired`
/// exists in older records; the display layer re-derives expiry from dates
/// either way (see [`crate::status::display_status`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemStatus {
    #[default]
    Available,
    Sold,
    Expired,
    Returned,
}

impl ItemStatus {
    /// Sold and returned items never change again.
    #[inline]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, ItemStatus::Sold | ItemStatus::Returned)
    }
}

/// The status shown to the operator, derived from [`ItemStatus`] and dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum DisplayStatus {
    Available,
    Sold,
    Expired,
    AboutToExpire,
    Returned,
}

impl DisplayStatus {
    /// Label used by the dashboard (pt-BR).
    pub const fn label(&self) -> &'static str {
        match self {
            DisplayStatus::Available => "Disponível",
            DisplayStatus::Sold => "Vendido",
            DisplayStatus::Expired => "Expirado",
            DisplayStatus::AboutToExpire => "Próximo a Expirar",
            DisplayStatus::Returned => "Devolvido",
        }
    }
}

/// An item owned by a supplier and sold on their behalf.
///
/// ## Invariant
/// `expiration_date` is fixed at creation (`start + term`) and never
/// re-derived, even if the shop's policy changes later.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ConsignedItem {
    pub id: String,
    pub supplier_id: String,
    /// Supplier-facing tag printed on the label, e.g. "MDS001".
    pub supplier_code: String,
    #[ts(as = "String")]
    pub consignment_start_date: NaiveDate,
    #[ts(as = "String")]
    pub expiration_date: NaiveDate,
    pub sale_price: Money,
    pub status: ItemStatus,
    #[serde(flatten)]
    pub details: ItemDetails,
}

impl ConsignedItem {
    /// Creates a new available item, fixing its expiration date from `policy`.
    pub fn new(
        id: impl Into<String>,
        supplier_id: impl Into<String>,
        supplier_code: impl Into<String>,
        start: NaiveDate,
        sale_price: Money,
        policy: &ConsignmentPolicy,
    ) -> Self {
        ConsignedItem {
            id: id.into(),
            supplier_id: supplier_id.into(),
            supplier_code: supplier_code.into(),
            consignment_start_date: start,
            expiration_date: policy.expiration_for(start),
            sale_price,
            status: ItemStatus::Available,
            details: ItemDetails::default(),
        }
    }

    /// Builder-style setter for descriptive attributes.
    pub fn with_details(mut self, details: ItemDetails) -> Self {
        self.details = details;
        self
    }
}

// =============================================================================
// Payouts
// =============================================================================

/// How a supplier receives their share.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PayoutKind {
    /// Store credit ("crédito de loja").
    Credit,
    /// Cash ("dinheiro").
    Cash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PayoutStatus {
    #[default]
    Pending,
    Paid,
}

/// A record of money owed or paid to a supplier. Append-only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PayoutEntry {
    pub id: String,
    pub supplier_id: String,
    /// Sale that originated the entry; withdrawals have none.
    pub sale_id: Option<String>,
    pub amount: Money,
    pub kind: PayoutKind,
    pub status: PayoutStatus,
    /// Request or payment date. Legacy entries may have none.
    #[ts(as = "Option<String>")]
    pub date: Option<NaiveDate>,
}

impl PayoutEntry {
    /// A new pending withdrawal request, dated `today`.
    pub fn pending_withdrawal(
        supplier_id: impl Into<String>,
        amount: Money,
        kind: PayoutKind,
        today: NaiveDate,
    ) -> Self {
        PayoutEntry {
            id: uuid::Uuid::new_v4().to_string(),
            supplier_id: supplier_id.into(),
            sale_id: None,
            amount,
            kind,
            status: PayoutStatus::Pending,
            date: Some(today),
        }
    }

    #[inline]
    pub fn is_paid(&self) -> bool {
        self.status == PayoutStatus::Paid
    }
}

// =============================================================================
// Garimpo Item
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum GarimpoStatus {
    #[default]
    Available,
    Sold,
}

/// An item sourced and owned by the shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GarimpoItem {
    pub id: String,
    /// Where it was bought (thrift store, bazaar, ...).
    pub purchase_place: String,
    #[ts(as = "String")]
    pub purchase_date: NaiveDate,
    pub purchase_cost: Money,
    /// Cleaning, repairs, transport.
    pub extra_costs: Money,
    /// Markup over total cost, in basis points (6000 = 60%).
    pub margin_bps: u32,
    pub sale_price: Money,
    pub status: GarimpoStatus,
    #[ts(as = "String")]
    pub stocked_on: NaiveDate,
    #[serde(flatten)]
    pub details: ItemDetails,
}

impl GarimpoItem {
    /// Purchase cost plus extra costs.
    #[inline]
    pub fn total_cost(&self) -> Money {
        self.purchase_cost + self.extra_costs
    }
}

// =============================================================================
// Customer
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Customer {
    pub id: String,
    pub name: String,
    pub cpf: Option<String>,
    pub phone: String,
    pub email: Option<String>,
    pub address: Option<Address>,
    #[ts(as = "String")]
    pub registered_on: NaiveDate,
    /// Sale ids, oldest first.
    #[serde(default)]
    pub purchase_history: Vec<String>,
}

// =============================================================================
// Sale
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    Pix,
    Card,
    StoreCredit,
}

/// Which inventory a sale line comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum ItemKind {
    Garimpo,
    Consigned,
}

/// A line item in a sale. Prices are frozen at the moment of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleLine {
    pub item_id: String,
    pub kind: ItemKind,
    pub sale_price: Money,
    /// What the item cost the shop (see [`crate::pricing::consigned_line`]).
    pub cost_basis: Money,
}

/// A completed sale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Sale {
    pub id: String,
    #[ts(as = "String")]
    pub sold_on: NaiveDate,
    pub customer_id: Option<String>,
    pub customer_name: String,
    pub lines: Vec<SaleLine>,
    pub total: Money,
    pub cost: Money,
    pub profit: Money,
    pub payment_method: PaymentMethod,
}

// =============================================================================
// Unit Tests
// =============================================================================
