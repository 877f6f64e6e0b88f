//! # Consignment Status
//!
//! Derives what the operator sees for a consigned item, and guards the
//! explicit status transitions (sold / returned).
//!
//! ## Derivation Precedence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  display_status(item, today)                                            │
//! │                                                                         │
//! │  1. status == Sold             → Sold         (terminal, ignores dates) │
//! │  2. status == Returned         → Returned     (terminal, ignores dates) │
//! │  3. today > expiration_date    → Expired                                │
//! │  4. expiration − today ≤ 30d   → AboutToExpire                          │
//! │  5. otherwise                  → Available                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Time never mutates the stored `status`; only the displayed label is
//! time-derived, so it can be recomputed from persisted state at any time.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::types::{ConsignedItem, ConsignmentPolicy, DisplayStatus, ItemStatus};

// =============================================================================
// Derivation
// =============================================================================

/// Classifies `item` as of `today` under the default policy.
///
/// ## Example
/// ```rust
/// use brecho_core::status::display_status;
/// use brecho_core::types::{ConsignedItem, ConsignmentPolicy, DisplayStatus};
/// use brecho_core::Money;
/// use chrono::NaiveDate;
///
/// let start = NaiveDate::from_ymd_opt(2024, 7, 15).unwrap();
/// let item = ConsignedItem::new("ic5", "f1", "MDS005", start, Money::from_cents(10000),
///     &ConsignmentPolicy::default());
///
/// let today = NaiveDate::from_ymd_opt(2024, 8, 1).unwrap();
/// assert_eq!(display_status(&item, today), DisplayStatus::Available);
///
/// let later = NaiveDate::from_ymd_opt(2024, 10, 16).unwrap();
/// assert_eq!(display_status(&item, later), DisplayStatus::Expired);
/// ```
pub fn display_status(item: &ConsignedItem, today: NaiveDate) -> DisplayStatus {
    display_status_with(item, today, &ConsignmentPolicy::default())
}

/// Same as [`display_status`] with an explicit warning window.
pub fn display_status_with(
    item: &ConsignedItem,
    today: NaiveDate,
    policy: &ConsignmentPolicy,
) -> DisplayStatus {
    match item.status {
        ItemStatus::Sold => return DisplayStatus::Sold,
        ItemStatus::Returned => return DisplayStatus::Returned,
        // A stored Expired flag is legacy; dates decide below.
        ItemStatus::Available | ItemStatus::Expired => {}
    }

    let remaining = days_until_expiration(item, today);
    if remaining < 0 {
        DisplayStatus::Expired
    } else if remaining <= policy.expiring_window_days {
        DisplayStatus::AboutToExpire
    } else {
        DisplayStatus::Available
    }
}

/// Whole days from `today` to the expiration date. Negative once expired.
#[inline]
pub fn days_until_expiration(item: &ConsignedItem, today: NaiveDate) -> i64 {
    (item.expiration_date - today).num_days()
}

/// True once `today` is strictly past the expiration date.
#[inline]
pub fn is_past_expiration(item: &ConsignedItem, today: NaiveDate) -> bool {
    today > item.expiration_date
}

// =============================================================================
// Transitions
// =============================================================================

impl ConsignedItem {
    /// Marks the item as sold.
    ///
    /// ## Rules
    /// - Only from `Available`
    /// - Not after the consignment expired (it must go back to the supplier)
    pub fn mark_sold(&mut self, today: NaiveDate) -> CoreResult<()> {
        self.ensure_available(ItemStatus::Sold)?;

        if is_past_expiration(self, today) {
            return Err(CoreError::ItemExpired {
                item_id: self.id.clone(),
                expired_on: self.expiration_date.to_string(),
            });
        }

        self.status = ItemStatus::Sold;
        Ok(())
    }

    /// Marks the item as returned to its supplier.
    ///
    /// Expired-by-date items can (and usually should) be returned.
    pub fn mark_returned(&mut self) -> CoreResult<()> {
        self.ensure_available(ItemStatus::Returned)?;
        self.status = ItemStatus::Returned;
        Ok(())
    }

    /// Sold items stay on record for the supplier statement.
    #[inline]
    pub fn can_delete(&self) -> bool {
        self.status != ItemStatus::Sold
    }

    fn ensure_available(&self, target: ItemStatus) -> CoreResult<()> {
        if self.status.is_terminal() {
            return Err(CoreError::InvalidItemTransition {
                item_id: self.id.clone(),
                current: self.status,
                target,
            });
        }
        Ok(())
    }
}

// =============================================================================
// List Filtering
// =============================================================================

/// Status filter of the consignment list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum StatusFilter {
    #[default]
    All,
    Available,
    Sold,
    Expired,
    AboutToExpire,
    Returned,
}

impl StatusFilter {
    /// Whether `item` belongs in the list filtered by `self`, classified
    /// with the warning window of `policy`.
    pub fn matches(
        &self,
        item: &ConsignedItem,
        today: NaiveDate,
        policy: &ConsignmentPolicy,
    ) -> bool {
        self.accepts(display_status_with(item, today, policy))
    }

    /// Whether an item already shown as `shown` passes the filter.
    pub fn accepts(&self, shown: DisplayStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Available => shown == DisplayStatus::Available,
            StatusFilter::Sold => shown == DisplayStatus::Sold,
            StatusFilter::Expired => shown == DisplayStatus::Expired,
            StatusFilter::AboutToExpire => shown == DisplayStatus::AboutToExpire,
            StatusFilter::Returned => shown == DisplayStatus::Returned,
        }
    }
}

/// Case-insensitive substring search over brand, category, supplier code
/// and the supplier's name. An empty query matches everything.
pub fn matches_search(item: &ConsignedItem, supplier_name: Option<&str>, query: &str) -> bool {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return true;
    }

    let hit = |field: Option<&str>| field.is_some_and(|f| f.to_lowercase().contains(&query));

    hit(item.details.brand.as_deref())
        || hit(item.details.category.as_deref())
        || hit(Some(item.supplier_code.as_str()))
        || hit(supplier_name)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use chrono::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 9, 1).unwrap()
    }

    fn item_expiring_in(days: i64) -> ConsignedItem {
        let mut item = ConsignedItem::new(
            "ic1",
            "f1",
            "MDS001",
            today() - Duration::days(60),
            Money::from_cents(8000),
            &ConsignmentPolicy::default(),
        );
        item.expiration_date = today() + Duration::days(days);
        item
    }

    #[test]
    fn test_terminal_status_overrides_dates() {
        for days in [-400, -1, 0, 10, 30, 31, 400] {
            let mut sold = item_expiring_in(days);
            sold.status = ItemStatus::Sold;
            assert_eq!(display_status(&sold, today()), DisplayStatus::Sold);

            let mut returned = item_expiring_in(days);
            returned.status = ItemStatus::Returned;
            assert_eq!(display_status(&returned, today()), DisplayStatus::Returned);
        }
    }

    #[test]
    fn test_past_expiration_is_expired() {
        assert_eq!(display_status(&item_expiring_in(-1), today()), DisplayStatus::Expired);
        assert_eq!(display_status(&item_expiring_in(-90), today()), DisplayStatus::Expired);
    }

    #[test]
    fn test_expiration_day_itself_is_not_expired() {
        let item = item_expiring_in(0);
        assert_ne!(display_status(&item, today()), DisplayStatus::Expired);
        assert_eq!(display_status(&item, today()), DisplayStatus::AboutToExpire);
    }

    #[test]
    fn test_thirty_day_boundary() {
        assert_eq!(display_status(&item_expiring_in(29), today()), DisplayStatus::AboutToExpire);
        assert_eq!(display_status(&item_expiring_in(30), today()), DisplayStatus::AboutToExpire);
        assert_eq!(display_status(&item_expiring_in(31), today()), DisplayStatus::Available);
    }

    #[test]
    fn test_legacy_expired_flag_is_rederived_from_dates() {
        let mut item = item_expiring_in(45);
        item.status = ItemStatus::Expired;
        assert_eq!(display_status(&item, today()), DisplayStatus::Available);
    }

    #[test]
    fn test_custom_window() {
        let policy = ConsignmentPolicy {
            expiring_window_days: 7,
            ..ConsignmentPolicy::default()
        };
        let item = item_expiring_in(10);
        assert_eq!(display_status_with(&item, today(), &policy), DisplayStatus::Available);
    }

    #[test]
    fn test_mark_sold_and_returned() {
        let mut item = item_expiring_in(40);
        item.mark_sold(today()).unwrap();
        assert_eq!(item.status, ItemStatus::Sold);
        assert!(!item.can_delete());

        // Terminal: nothing else is allowed.
        assert!(matches!(
            item.mark_returned(),
            Err(CoreError::InvalidItemTransition { .. })
        ));
        assert!(item.mark_sold(today()).is_err());
    }

    #[test]
    fn test_expired_item_cannot_be_sold_but_can_be_returned() {
        let mut item = item_expiring_in(-5);
        assert!(matches!(item.mark_sold(today()), Err(CoreError::ItemExpired { .. })));
        assert_eq!(item.status, ItemStatus::Available);

        item.mark_returned().unwrap();
        assert_eq!(item.status, ItemStatus::Returned);
        assert!(item.can_delete());
    }

    #[test]
    fn test_status_filter() {
        let soon = item_expiring_in(10);
        let later = item_expiring_in(60);
        let gone = item_expiring_in(-2);

        let policy = ConsignmentPolicy::default();

        assert!(StatusFilter::All.matches(&gone, today(), &policy));
        assert!(StatusFilter::AboutToExpire.matches(&soon, today(), &policy));
        assert!(!StatusFilter::Available.matches(&soon, today(), &policy));
        assert!(StatusFilter::Available.matches(&later, today(), &policy));
        assert!(StatusFilter::Expired.matches(&gone, today(), &policy));
        assert!(!StatusFilter::Sold.matches(&later, today(), &policy));
    }

    #[test]
    fn test_status_filter_follows_policy_window() {
        let soon = item_expiring_in(10);
        let narrow = ConsignmentPolicy {
            expiring_window_days: 5,
            ..ConsignmentPolicy::default()
        };

        assert!(StatusFilter::Available.matches(&soon, today(), &narrow));
        assert!(!StatusFilter::AboutToExpire.matches(&soon, today(), &narrow));
    }

    #[test]
    fn test_search() {
        let mut item = item_expiring_in(60);
        item.details.brand = Some("Farm".to_string());
        item.details.category = Some("Vestido".to_string());

        assert!(matches_search(&item, Some("Maria da Silva"), ""));
        assert!(matches_search(&item, Some("Maria da Silva"), "farm"));
        assert!(matches_search(&item, Some("Maria da Silva"), "VESTI"));
        assert!(matches_search(&item, Some("Maria da Silva"), "mds0"));
        assert!(matches_search(&item, Some("Maria da Silva"), "silva"));
        assert!(!matches_search(&item, None, "silva"));
        assert!(!matches_search(&item, Some("Maria da Silva"), "adidas"));
    }
}
