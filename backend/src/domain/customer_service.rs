//! Customer mutations.
//!
//! Deletion is delegated to [`CascadingDeleteOrchestrator`]; profile image
//! replacement discards the previous upload once the row points at the new
//! one.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{error, info};

use crate::domain::cascade::CascadingDeleteOrchestrator;
use crate::domain::ports::{BlobStorage, CustomerCommand, CustomerRepository};
use crate::domain::storage_faults::map_blob_error;
use crate::domain::{
    CachedView, CustomerDraft, CustomerId, Error, FormFields, FormState, ImageReference,
    MutationOutcome, ViewInvalidator, validate_profile_image,
};

const CREATE_INVALID: &str = "Missing Fields. Failed to Create Customer.";
const UPDATE_INVALID: &str = "Missing Fields. Failed to Update Customer.";
const PROFILE_INVALID: &str = "Missing Fields. Failed to Update Customer profile.";
const CREATE_FAILED: &str = "Database Error: Failed to Create Customer.";
const UPDATE_FAILED: &str = "Database Error: Failed to Update Customer.";
const PROFILE_FAILED: &str = "Database Error: Failed to Update Customer profile.";

/// Customer service implementing [`CustomerCommand`].
#[derive(Clone)]
pub struct CustomerService {
    customers: Arc<dyn CustomerRepository>,
    blobs: Arc<dyn BlobStorage>,
    cascade: CascadingDeleteOrchestrator,
    views: ViewInvalidator,
}

impl CustomerService {
    pub fn new(
        customers: Arc<dyn CustomerRepository>,
        blobs: Arc<dyn BlobStorage>,
        cascade: CascadingDeleteOrchestrator,
        views: ViewInvalidator,
    ) -> Self {
        Self {
            customers,
            blobs,
            cascade,
            views,
        }
    }

    async fn discard_previous_image(
        &self,
        id: &CustomerId,
        previous: Option<ImageReference>,
        current: &ImageReference,
    ) -> Result<(), Error> {
        let Some(key) = previous
            .filter(|image| image != current)
            .and_then(|image| image.blob_key())
        else {
            return Ok(());
        };
        // Outside a cascade there is no report to collect into.
        self.blobs
            .delete_files(std::slice::from_ref(&key))
            .await
            .map_err(map_blob_error)?;
        info!(customer_id = %id, blob_key = %key, "previous profile image deleted");
        Ok(())
    }
}

#[async_trait]
impl CustomerCommand for CustomerService {
    async fn create_customer(&self, fields: &FormFields) -> Result<MutationOutcome, Error> {
        let draft = match CustomerDraft::validate(fields).into_form_result(CREATE_INVALID) {
            Ok(draft) => draft,
            Err(state) => return Ok(MutationOutcome::Failure(state)),
        };

        match self.customers.create(&draft).await {
            Ok(id) => {
                info!(customer_id = %id, "customer created");
                Ok(MutationOutcome::redirect(
                    self.views.invalidate_and_return(CachedView::CustomerList),
                ))
            }
            Err(err) => {
                error!(error = %err, "customer insert failed");
                Ok(MutationOutcome::Failure(FormState::message(CREATE_FAILED)))
            }
        }
    }

    async fn update_customer(
        &self,
        id: &CustomerId,
        fields: &FormFields,
    ) -> Result<MutationOutcome, Error> {
        let draft = match CustomerDraft::validate(fields).into_form_result(UPDATE_INVALID) {
            Ok(draft) => draft,
            Err(state) => return Ok(MutationOutcome::Failure(state)),
        };

        match self.customers.update(id, &draft).await {
            Ok(()) => {
                info!(customer_id = %id, "customer updated");
                Ok(MutationOutcome::redirect(
                    self.views.invalidate_and_return(CachedView::CustomerList),
                ))
            }
            Err(err) => {
                error!(customer_id = %id, error = %err, "customer update failed");
                Ok(MutationOutcome::Failure(FormState::message(UPDATE_FAILED)))
            }
        }
    }

    async fn update_customer_profile(
        &self,
        id: &CustomerId,
        fields: &FormFields,
    ) -> Result<MutationOutcome, Error> {
        let image = match validate_profile_image(fields).into_form_result(PROFILE_INVALID) {
            Ok(image) => image,
            Err(state) => return Ok(MutationOutcome::Failure(state)),
        };

        let previous = match self.customers.find_image(id).await {
            Ok(previous) => previous,
            Err(err) => {
                error!(customer_id = %id, error = %err, "profile image lookup failed");
                return Ok(MutationOutcome::Failure(FormState::message(PROFILE_FAILED)));
            }
        };
        if let Err(err) = self.customers.update_image(id, &image).await {
            error!(customer_id = %id, error = %err, "profile image update failed");
            return Ok(MutationOutcome::Failure(FormState::message(PROFILE_FAILED)));
        }

        self.discard_previous_image(id, previous, &image).await?;
        self.views.invalidate(CachedView::CustomerList);
        Ok(MutationOutcome::done())
    }

    async fn delete_customer(&self, id: &CustomerId) -> Result<MutationOutcome, Error> {
        self.cascade.delete_customer(id).await?;
        Ok(MutationOutcome::done())
    }
}

#[cfg(test)]
#[path = "customer_service_tests.rs"]
mod tests;
