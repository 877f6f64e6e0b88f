//! # Repository Module
//!
//! Repository handles over the shared tables.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  Dashboard action                                                      │
//! │       │                                                                 │
//! │       │  store.payouts().request_withdrawal("f1", amount, Cash, today) │
//! │       ▼                                                                 │
//! │  PayoutRepository                                                      │
//! │  ├── takes the write guard                                             │
//! │  ├── asks brecho-core for the statement + validation                   │
//! │  └── appends the pending entry                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Tables (Arc<RwLock<..>>)                                              │
//! │                                                                         │
//! │  Rules live in brecho-core; repositories only decide *when* they run   │
//! │  and keep each write atomic.                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`SupplierRepository`](supplier::SupplierRepository) - Suppliers, statements, portal passwords
//! - [`ConsignmentRepository`](consignment::ConsignmentRepository) - Consigned items and status changes
//! - [`PayoutRepository`](payout::PayoutRepository) - Withdrawal requests and settlements
//! - [`GarimpoRepository`](garimpo::GarimpoRepository) - Shop-owned stock
//! - [`SaleRepository`](sale::SaleRepository) - Sale registration and reports
//! - [`CustomerRepository`](customer::CustomerRepository) - Customers and purchase history

pub mod consignment;
pub mod customer;
pub mod garimpo;
pub mod payout;
pub mod sale;
pub mod supplier;
