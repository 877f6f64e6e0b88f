//! # Store Error Types
//!
//! Error types for store operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError / WithdrawalError (brecho-core)                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  CoreError (brecho-core)                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← adds lookup misses and duplicates          │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Dashboard shows a toast                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Read paths (`get`, `statement`) return `Option` on a miss. `NotFound`
//! only appears when a *write* targets a record that does not exist.

use brecho_core::{CoreError, ValidationError, WithdrawalError};
use thiserror::Error;

/// Store operation errors.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Entity not found.
    ///
    /// ## When This Occurs
    /// - Marking an unknown item as sold
    /// - Requesting a withdrawal for a deleted supplier
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Unique constraint violation.
    ///
    /// ## When This Occurs
    /// - Inserting a record whose id already exists
    /// - Registering a second supplier with the same CPF
    #[error("Duplicate {field}: '{value}' already exists")]
    Duplicate { field: String, value: String },

    /// A record cannot be deleted (e.g. a sold consigned item).
    #[error("{entity} {id} cannot be deleted")]
    DeleteForbidden { entity: String, id: String },

    /// Business rule violation from brecho-core.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Password hashing failed.
    #[error("Password hashing failed: {0}")]
    PasswordHash(String),
}

impl StoreError {
    /// Creates a NotFound error for a given entity type and ID.
    pub fn not_found(entity: impl Into<String>, id: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity: entity.into(),
            id: id.into(),
        }
    }

    /// Creates a Duplicate error.
    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        StoreError::Duplicate {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(err: ValidationError) -> Self {
        StoreError::Core(CoreError::Validation(err))
    }
}

impl From<WithdrawalError> for StoreError {
    fn from(err: WithdrawalError) -> Self {
        StoreError::Core(CoreError::Withdrawal(err))
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
