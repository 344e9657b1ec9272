//! Port abstraction for user persistence adapters and their errors.

use async_trait::async_trait;

use crate::domain::{DeleteOutcome, NewUser, StoredCredentials, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a user and return the storage-assigned identifier.
    async fn create(&self, user: &NewUser) -> Result<UserId, UserPersistenceError>;

    /// Overwrite name, email and password hash.
    async fn update(&self, id: &UserId, user: &NewUser) -> Result<(), UserPersistenceError>;

    /// Delete a user row by identifier.
    async fn delete(&self, id: &UserId) -> Result<DeleteOutcome, UserPersistenceError>;

    /// Count rows registered under `email`, ignoring `excluding` when set.
    async fn count_by_email(
        &self,
        email: &str,
        excluding: Option<UserId>,
    ) -> Result<u64, UserPersistenceError>;

    /// Fetch sign-in material for `email`.
    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError>;
}
