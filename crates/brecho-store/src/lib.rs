//! # brecho-store: State Owner for the Brechó Back Office
//!
//! This crate owns the back office's records and applies the rules of
//! brecho-core to them, one atomic write at a time.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Brechó Back Office Data Flow                       │
//! │                                                                         │
//! │  Dashboard action (Solicitar saque)                                    │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   brecho-store (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │    Store      │    │  Repositories │    │   Seed       │  │   │
//! │  │   │  (store.rs)   │    │ (repository/) │    │  (seed.rs)   │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ RwLock<Tables>│◄───│ SupplierRepo  │    │ demo tables  │  │   │
//! │  │   │ StoreConfig   │    │ PayoutRepo    │    │ f1..f3       │  │   │
//! │  │   │               │    │ SaleRepo ...  │    │ ic1..ic6     │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │           brecho-core (statement, status, pricing)              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`store`] - The store handle and its tables
//! - [`config`] - Consignment terms and environment overrides
//! - [`repository`] - Repository implementations (supplier, payout, sale, ...)
//! - [`seed`] - Demo data set
//! - [`error`] - Store error types
//!
//! ## Usage
//!
//! ```rust,ignore
//! use brecho_store::{Store, StoreConfig};
//! use brecho_core::{Money, PayoutKind};
//!
//! let store = Store::open(StoreConfig::from_env(), today).await;
//!
//! let statement = store.suppliers().statement("f1").await;
//! store
//!     .payouts()
//!     .request_withdrawal("f1", Money::from_cents(3000), PayoutKind::Credit, today)
//!     .await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod error;
pub mod repository;
pub mod seed;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::StoreConfig;
pub use error::{StoreError, StoreResult};
pub use store::{Store, Tables};

// Repository re-exports for convenience
pub use repository::consignment::{ConsignmentRepository, ItemView};
pub use repository::customer::CustomerRepository;
pub use repository::garimpo::{GarimpoRepository, NewGarimpoItem};
pub use repository::payout::PayoutRepository;
pub use repository::sale::{NewSale, SaleItemRef, SaleRepository};
pub use repository::supplier::SupplierRepository;
