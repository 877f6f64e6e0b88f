//! # Error Types
//!
//! Domain-specific error types for brecho-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  brecho-core errors (this file)                                        │
//! │  ├── CoreError        - Business rule violations                       │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── WithdrawalError  - Rejected withdrawal requests                   │
//! │                                                                         │
//! │  brecho-store errors (separate crate)                                  │
//! │  └── StoreError       - Lookup misses on write paths, duplicates       │
//! │                                                                         │
//! │  Flow: ValidationError/WithdrawalError → CoreError → StoreError → UI   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A supplier or item that cannot be found on a *read* path is not an
//! error at all: those lookups return `Option` and the caller decides.

use thiserror::Error;

use crate::money::Money;
use crate::types::{ItemStatus, PayoutKind};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// These errors represent business rule violations. The dashboard is
/// responsible for turning them into user-facing messages.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A consigned item is in a state that does not allow the transition.
    ///
    /// ## When This Occurs
    /// - Marking an already sold item as sold again
    /// - Returning an item that was already sold or returned
    #[error("Item {item_id} is {current:?}, cannot mark as {target:?}")]
    InvalidItemTransition {
        item_id: String,
        current: ItemStatus,
        target: ItemStatus,
    },

    /// The consignment period is over; the item can only go back to the supplier.
    #[error("Item {item_id} expired on {expired_on}, it cannot be sold")]
    ItemExpired { item_id: String, expired_on: String },

    /// A garimpo item was already sold.
    #[error("Garimpo item {0} is already sold")]
    GarimpoAlreadySold(String),

    /// A sale must carry at least one line.
    #[error("A sale needs at least one item")]
    EmptySale,

    /// The same item appears twice in one sale.
    #[error("Item {0} appears more than once in the sale")]
    DuplicateSaleLine(String),

    /// A payout entry cannot move to the requested status.
    #[error("Payout {0} is already paid")]
    PayoutAlreadyPaid(String),

    /// Withdrawal request rejected.
    #[error(transparent)]
    Withdrawal(#[from] WithdrawalError),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Withdrawal Error
// =============================================================================

/// Reasons a supplier withdrawal ("saque") request is refused.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WithdrawalError {
    /// Zero or negative amount requested.
    #[error("Withdrawal amount must be positive, got {requested}")]
    InvalidAmount { requested: Money },

    /// Requested more than the available balance of that kind.
    ///
    /// ## User Workflow
    /// ```text
    /// Extrato: cash balance R$ 100,00
    ///      │
    ///      ▼
    /// Request R$ 150,00 in cash
    ///      │
    ///      ▼
    /// InsufficientFunds { kind: Cash, requested: 150,00, available: 100,00 }
    /// ```
    #[error("Insufficient {kind:?} balance: requested {requested}, available {available}")]
    InsufficientFunds {
        kind: PayoutKind,
        requested: Money,
        available: Money,
    },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when form input doesn't meet requirements.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative.
    #[error("{field} must not be negative")]
    MustNotBeNegative { field: String },

    /// Invalid format (e.g., CPF with the wrong number of digits).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value must have an exact length.
    #[error("{field} must have exactly {len} characters")]
    WrongLength { field: String, len: usize },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
