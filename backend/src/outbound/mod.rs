//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **persistence**: PostgreSQL-backed repositories and deletion journal
//!   using Diesel ORM
//! - **memory**: in-memory stand-ins for every storage port
//! - **blob**: HTTP client for the file host holding profile images
//! - **hashing**: salted password digests
//! - **auth**: credential verification against the user store
//! - **cache**: process-local view staleness flags
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod auth;
pub mod blob;
pub mod cache;
pub mod hashing;
pub mod memory;
pub mod persistence;
