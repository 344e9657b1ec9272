//! In-memory `DeletionJournal`.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::cascade::{DeletionPlan, JournaledPlan, PlanId, PlanResolution, StepStatus};
use crate::domain::ports::{DeletionJournal, DeletionJournalError};

use super::lock;

#[derive(Debug, Clone)]
struct Entry {
    plan: DeletionPlan,
    statuses: Vec<StepStatus>,
    resolution: Option<PlanResolution>,
}

/// Entries are kept after they finish so tests can inspect resolutions.
#[derive(Debug, Default)]
pub struct InMemoryDeletionJournal {
    entries: Mutex<Vec<Entry>>,
}

impl InMemoryDeletionJournal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolution recorded for plan `id`; `None` until the first run finishes.
    pub fn resolution(&self, id: &PlanId) -> Option<PlanResolution> {
        lock(&self.entries)
            .iter()
            .find(|entry| entry.plan.id() == *id)
            .and_then(|entry| entry.resolution)
    }

    /// Every plan ever begun, oldest first.
    pub fn plans(&self) -> Vec<DeletionPlan> {
        lock(&self.entries)
            .iter()
            .map(|entry| entry.plan.clone())
            .collect()
    }

    /// Last recorded step statuses of plan `id`.
    pub fn statuses(&self, id: &PlanId) -> Option<Vec<StepStatus>> {
        lock(&self.entries)
            .iter()
            .find(|entry| entry.plan.id() == *id)
            .map(|entry| entry.statuses.clone())
    }

    /// Record a plan directly, as if a previous process had crashed mid-way.
    pub fn seed_unfinished(&self, plan: DeletionPlan, statuses: Vec<StepStatus>) {
        lock(&self.entries).push(Entry {
            plan,
            statuses,
            resolution: None,
        });
    }
}

fn unknown(id: &PlanId) -> DeletionJournalError {
    DeletionJournalError::query(format!("no journal entry for plan {id}"))
}

#[async_trait]
impl DeletionJournal for InMemoryDeletionJournal {
    async fn begin(&self, plan: &DeletionPlan) -> Result<(), DeletionJournalError> {
        let mut entries = lock(&self.entries);
        if entries.iter().any(|entry| entry.plan.id() == plan.id()) {
            return Err(DeletionJournalError::query("unique constraint violated"));
        }
        entries.push(Entry {
            plan: plan.clone(),
            statuses: vec![StepStatus::Pending; plan.steps().len()],
            resolution: None,
        });
        Ok(())
    }

    async fn mark_step(
        &self,
        id: &PlanId,
        index: usize,
        status: StepStatus,
    ) -> Result<(), DeletionJournalError> {
        let mut entries = lock(&self.entries);
        let entry = entries
            .iter_mut()
            .find(|entry| entry.plan.id() == *id)
            .ok_or_else(|| unknown(id))?;
        let slot = entry
            .statuses
            .get_mut(index)
            .ok_or_else(|| DeletionJournalError::query("step index out of range"))?;
        *slot = status;
        Ok(())
    }

    async fn finish(
        &self,
        id: &PlanId,
        resolution: PlanResolution,
    ) -> Result<(), DeletionJournalError> {
        let mut entries = lock(&self.entries);
        let entry = entries
            .iter_mut()
            .find(|entry| entry.plan.id() == *id)
            .ok_or_else(|| unknown(id))?;
        entry.resolution = Some(resolution);
        Ok(())
    }

    async fn unfinished(&self) -> Result<Vec<JournaledPlan>, DeletionJournalError> {
        Ok(lock(&self.entries)
            .iter()
            .filter(|entry| !entry.resolution.is_some_and(PlanResolution::closes_plan))
            .map(|entry| JournaledPlan {
                plan: entry.plan.clone(),
                statuses: entry.statuses.clone(),
                resolution: entry.resolution,
            })
            .collect())
    }
}
