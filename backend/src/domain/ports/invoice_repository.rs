//! Port abstraction for invoice persistence adapters and their errors.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::{CustomerId, DeleteOutcome, InvoiceDraft, InvoiceId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by invoice repository adapters.
    pub enum InvoiceRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "invoice repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "invoice repository query failed: {message}",
    }
}

/// Single-row invoice statements plus the foreign-key lookup used by the
/// customer cascade.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Insert an invoice dated `date` and return its identifier.
    async fn create(
        &self,
        draft: &InvoiceDraft,
        date: NaiveDate,
    ) -> Result<InvoiceId, InvoiceRepositoryError>;

    /// Overwrite customer, amount and status. The creation date is kept.
    async fn update(&self, id: &InvoiceId, draft: &InvoiceDraft)
    -> Result<(), InvoiceRepositoryError>;

    /// Delete an invoice row by identifier.
    async fn delete(&self, id: &InvoiceId) -> Result<DeleteOutcome, InvoiceRepositoryError>;

    /// Identifiers of every invoice owned by `customer_id`.
    async fn list_ids_by_customer(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<InvoiceId>, InvoiceRepositoryError>;
}
