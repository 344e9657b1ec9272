//! Driving port for sign-in.
//!
//! Inbound adapters call it to check submitted credentials without knowing
//! (or importing) the backing infrastructure, so handler tests can swap in a
//! test double.

use async_trait::async_trait;

use crate::domain::{AuthOutcome, Error};

/// Domain use-case port for authentication.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Check raw sign-in fields.
    ///
    /// Recognised failures come back as [`AuthOutcome::Rejected`]; `Err` is
    /// reserved for faults the caller cannot recover from.
    async fn authenticate(&self, email: &str, password: &str) -> Result<AuthOutcome, Error>;
}
