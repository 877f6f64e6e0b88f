//! # brecho-core: Pure Business Logic for the Brechó Back Office
//!
//! This crate is the **heart** of the back office. It contains the
//! consignment rules as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Brechó Back Office Architecture                    │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    Dashboard (web)                              │   │
//! │  │   Consignação ──► Fornecedores/Extrato ──► Vendas ──► Relatório │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  brecho-store (state owner)                     │   │
//! │  │     tables behind a RwLock, repositories, seed data             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ LedgerSnapshot                         │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ brecho-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌───────────┐ ┌──────────┐ ┌────────────────┐  │   │
//! │  │   │  status  │ │ statement │ │ pricing  │ │ validation /   │  │   │
//! │  │   │ expiry   │ │ 50% / 40% │ │ reports  │ │ format         │  │   │
//! │  │   └──────────┘ └───────────┘ └──────────┘ └────────────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO GLOBAL STATE • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Supplier, ConsignedItem, PayoutEntry, Sale, ...)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`status`] - Display status derivation and item transitions
//! - [`statement`] - Supplier statement and withdrawal validation
//! - [`pricing`] - Garimpo pricing, sale totals, reports, dashboard
//! - [`source`] - Read interface consumed by the engine
//! - [`validation`] / [`format`] - Form rules and document masks
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use brecho_core::statement::PayoutSplit;
//! use brecho_core::types::ConsignmentPolicy;
//! use brecho_core::Money;
//!
//! // A R$ 100,00 consigned sale pays the supplier R$ 50,00 credit + R$ 40,00 cash
//! let split = PayoutSplit::of(Money::from_cents(10000), &ConsignmentPolicy::default());
//! assert_eq!((split.credit.cents(), split.cash.cents()), (5000, 4000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod format;
pub mod money;
pub mod pricing;
pub mod source;
pub mod statement;
pub mod status;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError, WithdrawalError};
pub use money::Money;
pub use source::{LedgerSnapshot, LedgerSource};
pub use statement::{compute_statement, validate_withdrawal, SupplierStatement};
pub use status::display_status;
pub use types::*;
