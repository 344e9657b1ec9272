//! Driving port for user account mutations.

use async_trait::async_trait;

use crate::domain::{Error, FormFields, MutationOutcome, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    async fn create_user(&self, fields: &FormFields) -> Result<MutationOutcome, Error>;

    async fn update_user(&self, id: &UserId, fields: &FormFields)
    -> Result<MutationOutcome, Error>;

    async fn delete_user(&self, id: &UserId) -> Result<MutationOutcome, Error>;
}
