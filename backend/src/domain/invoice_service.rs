//! Invoice mutations.
//!
//! Validation failures and create/update storage faults come back as
//! [`MutationOutcome::Failure`]; delete faults are fatal.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::{debug, error, info};

use crate::domain::ports::{InvoiceCommand, InvoiceRepository};
use crate::domain::storage_faults::map_invoice_error;
use crate::domain::{
    CachedView, DeleteOutcome, Error, FormFields, FormState, InvoiceDraft, InvoiceId,
    MutationOutcome, ViewInvalidator,
};

const CREATE_INVALID: &str = "Missing Fields. Failed to Create Invoice.";
const UPDATE_INVALID: &str = "Missing Fields. Failed to Update Invoice.";
const CREATE_FAILED: &str = "Database Error: Failed to Create Invoice.";
const UPDATE_FAILED: &str = "Database Error: Failed to Update Invoice.";

/// Invoice service implementing [`InvoiceCommand`].
#[derive(Clone)]
pub struct InvoiceService {
    invoices: Arc<dyn InvoiceRepository>,
    views: ViewInvalidator,
    clock: Arc<dyn Clock>,
}

impl InvoiceService {
    /// Create a new service. `clock` stamps the creation date.
    pub fn new(
        invoices: Arc<dyn InvoiceRepository>,
        views: ViewInvalidator,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            invoices,
            views,
            clock,
        }
    }
}

#[async_trait]
impl InvoiceCommand for InvoiceService {
    async fn create_invoice(&self, fields: &FormFields) -> Result<MutationOutcome, Error> {
        let draft = match InvoiceDraft::validate(fields).into_form_result(CREATE_INVALID) {
            Ok(draft) => draft,
            Err(state) => return Ok(MutationOutcome::Failure(state)),
        };
        let date = self.clock.utc().date_naive();

        match self.invoices.create(&draft, date).await {
            Ok(id) => {
                info!(invoice_id = %id, customer_id = %draft.customer_id(), "invoice created");
                Ok(MutationOutcome::redirect(
                    self.views.invalidate_and_return(CachedView::InvoiceList),
                ))
            }
            Err(err) => {
                error!(error = %err, "invoice insert failed");
                Ok(MutationOutcome::Failure(FormState::message(CREATE_FAILED)))
            }
        }
    }

    async fn update_invoice(
        &self,
        id: &InvoiceId,
        fields: &FormFields,
    ) -> Result<MutationOutcome, Error> {
        let draft = match InvoiceDraft::validate(fields).into_form_result(UPDATE_INVALID) {
            Ok(draft) => draft,
            Err(state) => return Ok(MutationOutcome::Failure(state)),
        };

        match self.invoices.update(id, &draft).await {
            Ok(()) => {
                info!(invoice_id = %id, "invoice updated");
                Ok(MutationOutcome::redirect(
                    self.views.invalidate_and_return(CachedView::InvoiceList),
                ))
            }
            Err(err) => {
                error!(invoice_id = %id, error = %err, "invoice update failed");
                Ok(MutationOutcome::Failure(FormState::message(UPDATE_FAILED)))
            }
        }
    }

    async fn delete_invoice(&self, id: &InvoiceId) -> Result<MutationOutcome, Error> {
        match self.invoices.delete(id).await.map_err(map_invoice_error)? {
            DeleteOutcome::Deleted => info!(invoice_id = %id, "invoice deleted"),
            DeleteOutcome::NotFound => debug!(invoice_id = %id, "invoice already absent"),
        }
        self.views.invalidate(CachedView::InvoiceList);
        Ok(MutationOutcome::done())
    }
}

#[cfg(test)]
#[path = "invoice_service_tests.rs"]
mod tests;
