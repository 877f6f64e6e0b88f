//! # Pricing, Sales & Reports
//!
//! Garimpo pricing, sale totals and the aggregates shown on the sales
//! report and the admin dashboard.
//!
//! ## Cost Basis
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Garimpo item   cost = purchase cost + extra costs                     │
//! │                 price = cost × (1 + margin)                            │
//! │                                                                         │
//! │  Consigned item cost = supplier credit share (50% of price)            │
//! │                                                                         │
//! │  Sale           total = Σ price, cost = Σ cost, profit = total − cost  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::status::display_status_with;
use crate::types::{
    ConsignedItem, ConsignmentPolicy, Customer, DisplayStatus, GarimpoItem, GarimpoStatus,
    ItemKind, Sale, SaleLine, Supplier,
};

// =============================================================================
// Garimpo Pricing
// =============================================================================

/// Suggested sale price of a garimpo item.
///
/// ## Example
/// ```rust
/// use brecho_core::pricing::garimpo_price;
/// use brecho_core::Money;
///
/// // (25,00 + 5,00) × 1.6 = 48,00
/// let price = garimpo_price(Money::from_cents(2500), Money::from_cents(500), 6000);
/// assert_eq!(price.cents(), 4800);
/// ```
pub fn garimpo_price(purchase_cost: Money, extra_costs: Money, margin_bps: u32) -> Money {
    (purchase_cost + extra_costs).apply_markup(margin_bps)
}

// =============================================================================
// Sale Lines
// =============================================================================

/// Freezes a garimpo item into a sale line.
pub fn garimpo_line(item: &GarimpoItem) -> SaleLine {
    SaleLine {
        item_id: item.id.clone(),
        kind: ItemKind::Garimpo,
        sale_price: item.sale_price,
        cost_basis: item.total_cost(),
    }
}

/// Freezes a consigned item into a sale line. Its cost to the shop is the
/// supplier's store-credit share.
pub fn consigned_line(item: &ConsignedItem, policy: &ConsignmentPolicy) -> SaleLine {
    SaleLine {
        item_id: item.id.clone(),
        kind: ItemKind::Consigned,
        sale_price: item.sale_price,
        cost_basis: item.sale_price.share(policy.credit_share),
    }
}

/// Totals of a sale.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SaleTotals {
    pub total: Money,
    pub cost: Money,
    pub profit: Money,
}

impl SaleTotals {
    /// Sums the lines of a sale.
    ///
    /// ## Rules
    /// - At least one line
    /// - No item twice
    pub fn from_lines(lines: &[SaleLine]) -> CoreResult<Self> {
        if lines.is_empty() {
            return Err(CoreError::EmptySale);
        }

        for (i, line) in lines.iter().enumerate() {
            if lines[..i].iter().any(|prev| prev.item_id == line.item_id) {
                return Err(CoreError::DuplicateSaleLine(line.item_id.clone()));
            }
        }

        let total: Money = lines.iter().map(|l| l.sale_price).sum();
        let cost: Money = lines.iter().map(|l| l.cost_basis).sum();

        Ok(SaleTotals {
            total,
            cost,
            profit: total - cost,
        })
    }
}

// =============================================================================
// Sales Report
// =============================================================================

/// Period filter of the sales report. `None` means "all".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ReportPeriod {
    /// 1-12.
    pub month: Option<u32>,
    pub year: Option<i32>,
}

impl ReportPeriod {
    /// A single calendar month.
    pub fn month_of(date: NaiveDate) -> Self {
        ReportPeriod {
            month: Some(date.month()),
            year: Some(date.year()),
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.month.map_or(true, |m| date.month() == m) && self.year.map_or(true, |y| date.year() == y)
    }
}

/// Aggregates of the sales report.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SalesReport {
    pub sales_count: u32,
    pub revenue: Money,
    pub profit: Money,
    pub items_sold: u32,
}

/// Summarizes the sales that fall inside `period`.
pub fn sales_report(sales: &[Sale], period: ReportPeriod) -> SalesReport {
    sales
        .iter()
        .filter(|sale| period.contains(sale.sold_on))
        .fold(SalesReport::default(), |mut report, sale| {
            report.sales_count += 1;
            report.revenue += sale.total;
            report.profit += sale.profit;
            report.items_sold += sale.lines.len() as u32;
            report
        })
}

// =============================================================================
// Dashboard
// =============================================================================

/// Cards of the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DashboardSummary {
    pub garimpo_available: u32,
    /// Consigned items still on the rack (available or about to expire).
    pub consignments_active: u32,
    pub consignments_expiring: u32,
    pub sales_this_month: u32,
    pub revenue_this_month: Money,
    pub profit_this_month: Money,
    pub new_suppliers_this_month: u32,
    pub new_customers_this_month: u32,
}

/// Everything the dashboard needs to render its cards.
pub struct DashboardInput<'a> {
    pub garimpo: &'a [GarimpoItem],
    pub consigned: &'a [ConsignedItem],
    pub sales: &'a [Sale],
    pub suppliers: &'a [Supplier],
    pub customers: &'a [Customer],
}

/// Computes the dashboard cards as of `today`. Consigned items are
/// classified with the warning window of `policy`.
pub fn dashboard_summary(
    input: &DashboardInput<'_>,
    today: NaiveDate,
    policy: &ConsignmentPolicy,
) -> DashboardSummary {
    let month = ReportPeriod::month_of(today);
    let report = sales_report(input.sales, month);

    let count = |n: usize| n as u32;
    let shown: Vec<DisplayStatus> = input
        .consigned
        .iter()
        .map(|item| display_status_with(item, today, policy))
        .collect();

    DashboardSummary {
        garimpo_available: count(
            input
                .garimpo
                .iter()
                .filter(|g| g.status == GarimpoStatus::Available)
                .count(),
        ),
        consignments_active: count(
            shown
                .iter()
                .filter(|s| matches!(s, DisplayStatus::Available | DisplayStatus::AboutToExpire))
                .count(),
        ),
        consignments_expiring: count(
            shown
                .iter()
                .filter(|s| **s == DisplayStatus::AboutToExpire)
                .count(),
        ),
        sales_this_month: report.sales_count,
        revenue_this_month: report.revenue,
        profit_this_month: report.profit,
        new_suppliers_this_month: count(
            input
                .suppliers
                .iter()
                .filter(|s| month.contains(s.registered_on))
                .count(),
        ),
        new_customers_this_month: count(
            input
                .customers
                .iter()
                .filter(|c| month.contains(c.registered_on))
                .count(),
        ),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
