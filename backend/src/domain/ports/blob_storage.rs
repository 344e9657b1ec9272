//! Port for the external file store holding customer profile images.

use async_trait::async_trait;

use crate::domain::BlobKey;

use super::define_port_error;

define_port_error! {
    /// Errors raised by blob storage adapters.
    pub enum BlobStorageError {
        /// The store could not be reached.
        Transport { message: String } => "blob storage transport failed: {message}",
        /// The request did not complete in time.
        Timeout { message: String } => "blob storage request timed out: {message}",
        /// The store answered but refused the deletion.
        Rejected { status: u16, message: String } =>
            "blob storage rejected request with status {status}: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BlobStorage: Send + Sync {
    /// Delete every file in `keys` in one request.
    async fn delete_files(&self, keys: &[BlobKey]) -> Result<(), BlobStorageError>;
}
