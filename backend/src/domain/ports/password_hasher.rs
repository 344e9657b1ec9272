//! One-way password hashing port.

use crate::domain::PasswordHash;

use super::define_port_error;

define_port_error! {
    /// Errors raised by password hashing adapters.
    pub enum PasswordHasherError {
        /// A stored digest could not be decoded.
        MalformedHash { message: String } => "stored password hash is malformed: {message}",
    }
}

/// Pluggable one-way hash with a matching verify function.
#[cfg_attr(test, mockall::automock)]
pub trait PasswordHasher: Send + Sync {
    /// Hash `password` with a fresh salt.
    fn hash(&self, password: &str) -> PasswordHash;

    /// Check `password` against a digest produced by [`PasswordHasher::hash`].
    fn verify(&self, password: &str, hash: &PasswordHash) -> Result<bool, PasswordHasherError>;
}
