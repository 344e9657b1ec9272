//! In-memory adapters for every storage port.
//!
//! Used when no database is configured and by cross-layer tests. Each
//! adapter records what it was asked to do and can be told to fail.

mod blobs;
mod customers;
mod invoices;
mod journal;
mod users;

pub use blobs::RecordingBlobStorage;
pub use customers::InMemoryCustomerRepository;
pub use invoices::InMemoryInvoiceRepository;
pub use journal::InMemoryDeletionJournal;
pub use users::InMemoryUserRepository;

use std::sync::{Mutex, MutexGuard, PoisonError};

/// Lock ignoring poisoning; state is only mutated under short critical
/// sections with no await points.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
