//! Sign-in gate.
//!
//! Classifies verifier results into the two sign-in failure kinds the caller
//! can show, and lets infrastructure faults through as fatal errors.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::domain::ports::{CredentialVerifier, CredentialVerifierError, LoginService};
use crate::domain::{AuthOutcome, CredentialFailure, Error, LoginCredentials};

/// [`LoginService`] backed by a [`CredentialVerifier`].
#[derive(Clone)]
pub struct CredentialGate {
    verifier: Arc<dyn CredentialVerifier>,
}

impl CredentialGate {
    pub fn new(verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self { verifier }
    }
}

#[async_trait]
impl LoginService for CredentialGate {
    async fn authenticate(&self, email: &str, password: &str) -> Result<AuthOutcome, Error> {
        let credentials = match LoginCredentials::try_from_parts(email, password) {
            Ok(credentials) => credentials,
            Err(err) => {
                debug!(reason = %err, "sign-in rejected before lookup");
                return Ok(AuthOutcome::Rejected(CredentialFailure::InvalidCredentials));
            }
        };

        match self.verifier.verify(&credentials).await {
            Ok(user_id) => {
                info!(user_id = %user_id, "user signed in");
                Ok(AuthOutcome::Authenticated(user_id))
            }
            Err(CredentialVerifierError::CredentialsRejected) => {
                Ok(AuthOutcome::Rejected(CredentialFailure::InvalidCredentials))
            }
            Err(CredentialVerifierError::Provider { message }) => {
                error!(%message, "credential provider failed");
                Ok(AuthOutcome::Rejected(CredentialFailure::Unknown))
            }
            Err(CredentialVerifierError::Storage { message }) => Err(Error::service_unavailable(
                format!("credential storage unavailable: {message}"),
            )),
        }
    }
}
