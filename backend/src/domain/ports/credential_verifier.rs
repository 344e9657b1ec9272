//! Port for the identity provider that checks sign-in secrets.

use async_trait::async_trait;

use crate::domain::{LoginCredentials, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential verifiers.
    ///
    /// `CredentialsRejected` and `Provider` are recognised sign-in failures;
    /// `Storage` is infrastructure and is never downgraded to a sign-in
    /// failure.
    pub enum CredentialVerifierError {
        /// Unknown identity or wrong secret.
        CredentialsRejected => "credentials rejected",
        /// The provider failed while checking the secret.
        Provider { message: String } => "credential provider failed: {message}",
        /// Backing credential storage is unavailable.
        Storage { message: String } => "credential storage failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CredentialVerifier: Send + Sync {
    /// Return the matching user when the secret verifies.
    async fn verify(&self, credentials: &LoginCredentials)
    -> Result<UserId, CredentialVerifierError>;
}
