//! Driving port for customer mutations, including the cascading delete.

use async_trait::async_trait;

use crate::domain::{CustomerId, Error, FormFields, MutationOutcome};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerCommand: Send + Sync {
    async fn create_customer(&self, fields: &FormFields) -> Result<MutationOutcome, Error>;

    async fn update_customer(
        &self,
        id: &CustomerId,
        fields: &FormFields,
    ) -> Result<MutationOutcome, Error>;

    /// Replace the profile image and discard the previous upload.
    async fn update_customer_profile(
        &self,
        id: &CustomerId,
        fields: &FormFields,
    ) -> Result<MutationOutcome, Error>;

    /// Remove the customer together with its invoices and uploaded image.
    async fn delete_customer(&self, id: &CustomerId) -> Result<MutationOutcome, Error>;
}
