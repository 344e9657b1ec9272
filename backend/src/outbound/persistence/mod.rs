//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Concrete implementations of the domain's storage ports backed by
//! PostgreSQL via `diesel-async` and a `bb8` connection pool.
//!
//! # Architecture
//!
//! - **Thin adapters**: repositories only translate between Diesel rows and
//!   domain types. Validation and cascade ordering live in the domain.
//! - **Internal models**: row structs (`models.rs`) and table definitions
//!   (`schema.rs`) never leave this module.
//! - **Strongly typed errors**: pool and Diesel failures are mapped onto each
//!   port's `Connection` and `Query` variants.
//!
//! # Example
//!
//! ```ignore
//! use backend::outbound::persistence::{DbPool, DieselCustomerRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/invoices")).await?;
//! let customers = DieselCustomerRepository::new(pool);
//! ```

mod diesel_customer_repository;
mod diesel_deletion_journal;
mod diesel_error_mapping;
mod diesel_invoice_repository;
mod diesel_user_repository;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_customer_repository::DieselCustomerRepository;
pub use diesel_deletion_journal::DieselDeletionJournal;
pub use diesel_invoice_repository::DieselInvoiceRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use migrations::{MigrationError, run_pending_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
