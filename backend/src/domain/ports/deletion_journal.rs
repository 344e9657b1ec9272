//! Write-ahead log for multi-step customer deletions.
//!
//! A plan is recorded before any step runs and finished once the customer
//! row is gone (or the delete is aborted). Plans left open by a crash are
//! replayed at start-up.

use async_trait::async_trait;

use crate::domain::cascade::{DeletionPlan, JournaledPlan, PlanId, PlanResolution, StepStatus};

use super::define_port_error;

define_port_error! {
    /// Errors raised by deletion journal adapters.
    pub enum DeletionJournalError {
        /// Journal storage could not be reached.
        Connection { message: String } => "deletion journal connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "deletion journal query failed: {message}",
        /// A stored plan could not be decoded.
        Corrupt { message: String } => "deletion journal entry is corrupt: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeletionJournal: Send + Sync {
    /// Record `plan` with every step pending.
    async fn begin(&self, plan: &DeletionPlan) -> Result<(), DeletionJournalError>;

    /// Record the status of step `index` of plan `id`.
    async fn mark_step(
        &self,
        id: &PlanId,
        index: usize,
        status: StepStatus,
    ) -> Result<(), DeletionJournalError>;

    /// Close plan `id`.
    async fn finish(&self, id: &PlanId, resolution: PlanResolution)
    -> Result<(), DeletionJournalError>;

    /// Plans that were begun but never finished, oldest first.
    async fn unfinished(&self) -> Result<Vec<JournaledPlan>, DeletionJournalError>;
}
