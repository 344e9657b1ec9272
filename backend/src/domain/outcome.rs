//! Results of the mutation pipeline.
//!
//! Driving ports return `Result<MutationOutcome, Error>`. `Ok(Failure(..))`
//! is recoverable and displayed inline next to the form; `Err(..)` is fatal
//! and reaches the caller's error boundary.

use super::form::FormState;

/// Where the caller should go after a successful mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    path: String,
}

impl Navigation {
    pub fn to(path: impl Into<String>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &str {
        self.path.as_str()
    }
}

/// Recoverable outcome of one mutation.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// The write happened. Deletes carry no navigation.
    Success(Option<Navigation>),
    /// Validation or a create/update write failed.
    Failure(FormState),
}

impl MutationOutcome {
    pub fn redirect(navigation: Navigation) -> Self {
        Self::Success(Some(navigation))
    }

    pub fn done() -> Self {
        Self::Success(None)
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// What a delete-by-id statement found.
///
/// A missing row is not a fault: deleting twice is a no-op the second time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    NotFound,
}

impl DeleteOutcome {
    pub fn from_affected_rows(rows: usize) -> Self {
        if rows == 0 {
            Self::NotFound
        } else {
            Self::Deleted
        }
    }
}
