//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, blob storage, hashing, credential checks, view
//! cache, deletion journal) are implemented by outbound adapters. Driving
//! ports (`*Command`, [`LoginService`]) are implemented by domain services
//! and called by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod blob_storage;
mod credential_verifier;
mod customer_command;
mod customer_repository;
mod deletion_journal;
mod invoice_command;
mod invoice_repository;
mod login_service;
mod password_hasher;
mod user_command;
mod user_repository;
mod view_cache;

#[cfg(test)]
pub use blob_storage::MockBlobStorage;
pub use blob_storage::{BlobStorage, BlobStorageError};
#[cfg(test)]
pub use credential_verifier::MockCredentialVerifier;
pub use credential_verifier::{CredentialVerifier, CredentialVerifierError};
#[cfg(test)]
pub use customer_command::MockCustomerCommand;
pub use customer_command::CustomerCommand;
#[cfg(test)]
pub use customer_repository::MockCustomerRepository;
pub use customer_repository::{CustomerRepository, CustomerRepositoryError};
#[cfg(test)]
pub use deletion_journal::MockDeletionJournal;
pub use deletion_journal::{DeletionJournal, DeletionJournalError};
#[cfg(test)]
pub use invoice_command::MockInvoiceCommand;
pub use invoice_command::InvoiceCommand;
#[cfg(test)]
pub use invoice_repository::MockInvoiceRepository;
pub use invoice_repository::{InvoiceRepository, InvoiceRepositoryError};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use password_hasher::MockPasswordHasher;
pub use password_hasher::{PasswordHasher, PasswordHasherError};
#[cfg(test)]
pub use user_command::MockUserCommand;
pub use user_command::UserCommand;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
#[cfg(test)]
pub use view_cache::MockViewCache;
pub use view_cache::ViewCache;
