//! Translation of port errors into fatal domain errors.
//!
//! Connection faults become `service_unavailable`, everything else
//! `internal_error`. Recoverable create/update failures never pass through
//! here; services turn those into form state themselves.

use super::Error;
use super::ports::{
    BlobStorageError, CustomerRepositoryError, DeletionJournalError, InvoiceRepositoryError,
    UserPersistenceError,
};

pub(crate) fn map_customer_error(error: CustomerRepositoryError) -> Error {
    match error {
        CustomerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("customer repository unavailable: {message}"))
        }
        CustomerRepositoryError::Query { message } => {
            Error::internal(format!("customer repository error: {message}"))
        }
    }
}

pub(crate) fn map_invoice_error(error: InvoiceRepositoryError) -> Error {
    match error {
        InvoiceRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("invoice repository unavailable: {message}"))
        }
        InvoiceRepositoryError::Query { message } => {
            Error::internal(format!("invoice repository error: {message}"))
        }
    }
}

pub(crate) fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
    }
}

pub(crate) fn map_journal_error(error: DeletionJournalError) -> Error {
    match error {
        DeletionJournalError::Connection { message } => {
            Error::service_unavailable(format!("deletion journal unavailable: {message}"))
        }
        DeletionJournalError::Query { message } | DeletionJournalError::Corrupt { message } => {
            Error::internal(format!("deletion journal error: {message}"))
        }
    }
}

pub(crate) fn map_blob_error(error: BlobStorageError) -> Error {
    match error {
        BlobStorageError::Transport { message } | BlobStorageError::Timeout { message } => {
            Error::service_unavailable(format!("blob storage unavailable: {message}"))
        }
        BlobStorageError::Rejected { status, message } => {
            Error::internal(format!("blob storage rejected deletion ({status}): {message}"))
        }
    }
}
