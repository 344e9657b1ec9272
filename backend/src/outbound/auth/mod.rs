//! Credential verifier backed by the user store and the password hasher.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use crate::domain::ports::{
    CredentialVerifier, CredentialVerifierError, PasswordHasher, UserRepository,
};
use crate::domain::{LoginCredentials, UserId};

/// Looks the user up by email and checks the secret against the stored hash.
#[derive(Clone)]
pub struct RepositoryCredentialVerifier {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
}

impl RepositoryCredentialVerifier {
    pub fn new(users: Arc<dyn UserRepository>, hasher: Arc<dyn PasswordHasher>) -> Self {
        Self { users, hasher }
    }
}

#[async_trait]
impl CredentialVerifier for RepositoryCredentialVerifier {
    async fn verify(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<UserId, CredentialVerifierError> {
        let stored = self
            .users
            .find_credentials(credentials.email())
            .await
            .map_err(|err| CredentialVerifierError::storage(err.to_string()))?;
        let Some(stored) = stored else {
            debug!("no account for sign-in email");
            return Err(CredentialVerifierError::credentials_rejected());
        };

        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(|err| CredentialVerifierError::provider(err.to_string()))?;
        if matches {
            Ok(stored.user_id)
        } else {
            Err(CredentialVerifierError::credentials_rejected())
        }
    }
}
