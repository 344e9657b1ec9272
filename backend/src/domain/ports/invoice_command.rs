//! Driving port for invoice mutations.

use async_trait::async_trait;

use crate::domain::{Error, FormFields, InvoiceId, MutationOutcome};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait InvoiceCommand: Send + Sync {
    async fn create_invoice(&self, fields: &FormFields) -> Result<MutationOutcome, Error>;

    async fn update_invoice(
        &self,
        id: &InvoiceId,
        fields: &FormFields,
    ) -> Result<MutationOutcome, Error>;

    /// Delete failures are fatal; a missing invoice is not a failure.
    async fn delete_invoice(&self, id: &InvoiceId) -> Result<MutationOutcome, Error>;
}
