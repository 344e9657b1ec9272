//! Port abstraction for customer persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{CustomerDraft, CustomerId, DeleteOutcome, ImageReference};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by customer repository adapters.
    pub enum CustomerRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "customer repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "customer repository query failed: {message}",
    }
}

/// Single-row customer statements.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepository: Send + Sync {
    /// Insert a customer and return the storage-assigned identifier.
    async fn create(&self, draft: &CustomerDraft) -> Result<CustomerId, CustomerRepositoryError>;

    /// Overwrite every mutable field of a customer.
    ///
    /// Updating a missing row is a no-op.
    async fn update(
        &self,
        id: &CustomerId,
        draft: &CustomerDraft,
    ) -> Result<(), CustomerRepositoryError>;

    /// Replace only the profile image reference.
    async fn update_image(
        &self,
        id: &CustomerId,
        image: &ImageReference,
    ) -> Result<(), CustomerRepositoryError>;

    /// Look up the current profile image reference.
    async fn find_image(
        &self,
        id: &CustomerId,
    ) -> Result<Option<ImageReference>, CustomerRepositoryError>;

    /// Delete a customer row by identifier.
    async fn delete(&self, id: &CustomerId) -> Result<DeleteOutcome, CustomerRepositoryError>;
}
