//! Invoice administration backend.
//!
//! Hexagonal layout: [`domain`] holds the mutation pipeline and its ports,
//! [`inbound`] the HTTP adapter and [`outbound`] the storage, blob, hashing
//! and cache adapters.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;
pub mod settings;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use middleware::Trace;
