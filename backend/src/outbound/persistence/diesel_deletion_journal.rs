//! PostgreSQL-backed `DeletionJournal` implementation using Diesel ORM.
//!
//! A plan is one `deletion_journal` row plus one `deletion_journal_steps` row
//! per step. Steps are stored as tagged JSON so a plan written by one release
//! can be replayed by the next.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::CustomerId;
use crate::domain::cascade::{
    DeletionPlan, DeletionStep, JournaledPlan, PlanId, PlanResolution, StepStatus,
};
use crate::domain::ports::{DeletionJournal, DeletionJournalError};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{JournalRow, JournalStepRow, NewJournalRow};
use super::pool::{DbPool, PoolError};
use super::schema::{deletion_journal, deletion_journal_steps};

/// Diesel-backed implementation of the `DeletionJournal` port.
#[derive(Clone)]
pub struct DieselDeletionJournal {
    pool: DbPool,
}

impl DieselDeletionJournal {
    /// Create a new journal with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> DeletionJournalError {
    map_pool_error(error, DeletionJournalError::connection)
}

fn diesel_error(error: diesel::result::Error) -> DeletionJournalError {
    map_diesel_error(
        error,
        DeletionJournalError::query,
        DeletionJournalError::connection,
    )
}

fn position(index: usize) -> Result<i32, DeletionJournalError> {
    i32::try_from(index).map_err(|_| DeletionJournalError::query("step index out of range"))
}

fn step_rows(plan: &DeletionPlan) -> Result<Vec<JournalStepRow>, DeletionJournalError> {
    plan.steps()
        .iter()
        .enumerate()
        .map(|(index, step)| {
            let step = serde_json::to_value(step)
                .map_err(|err| DeletionJournalError::query(err.to_string()))?;
            Ok(JournalStepRow {
                journal_id: *plan.id().as_uuid(),
                position: position(index)?,
                step,
                status: StepStatus::Pending.as_str().to_owned(),
            })
        })
        .collect()
}

/// Rebuild plans from their rows. `steps` must be ordered by position.
fn assemble(
    journals: Vec<JournalRow>,
    steps: Vec<JournalStepRow>,
) -> Result<Vec<JournaledPlan>, DeletionJournalError> {
    let mut by_journal: HashMap<Uuid, Vec<JournalStepRow>> = HashMap::new();
    for row in steps {
        by_journal.entry(row.journal_id).or_default().push(row);
    }

    journals
        .into_iter()
        .map(|journal| {
            let rows = by_journal.remove(&journal.id).unwrap_or_default();
            let mut plan_steps = Vec::with_capacity(rows.len());
            let mut statuses = Vec::with_capacity(rows.len());
            for row in rows {
                let step: DeletionStep = serde_json::from_value(row.step).map_err(|err| {
                    DeletionJournalError::corrupt(format!(
                        "plan {} step {}: {err}",
                        journal.id, row.position
                    ))
                })?;
                let status = row
                    .status
                    .parse::<StepStatus>()
                    .map_err(DeletionJournalError::corrupt)?;
                plan_steps.push(step);
                statuses.push(status);
            }
            let resolution = journal
                .resolution
                .as_deref()
                .map(str::parse::<PlanResolution>)
                .transpose()
                .map_err(DeletionJournalError::corrupt)?;
            Ok(JournaledPlan {
                plan: DeletionPlan::restore(
                    PlanId::from_uuid(journal.id),
                    CustomerId::from_uuid(journal.customer_id),
                    plan_steps,
                ),
                statuses,
                resolution,
            })
        })
        .collect()
}

#[async_trait]
impl DeletionJournal for DieselDeletionJournal {
    async fn begin(&self, plan: &DeletionPlan) -> Result<(), DeletionJournalError> {
        use diesel_async::AsyncConnection as _;
        use diesel_async::scoped_futures::ScopedFutureExt as _;

        let header = NewJournalRow {
            id: *plan.id().as_uuid(),
            customer_id: *plan.customer_id().as_uuid(),
        };
        let steps = step_rows(plan)?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        conn.transaction(|conn| {
            async move {
                diesel::insert_into(deletion_journal::table)
                    .values(&header)
                    .execute(conn)
                    .await?;
                if !steps.is_empty() {
                    diesel::insert_into(deletion_journal_steps::table)
                        .values(&steps)
                        .execute(conn)
                        .await?;
                }
                Ok(())
            }
            .scope_boxed()
        })
        .await
        .map_err(diesel_error)
    }

    async fn mark_step(
        &self,
        id: &PlanId,
        index: usize,
        status: StepStatus,
    ) -> Result<(), DeletionJournalError> {
        let position = position(index)?;
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::update(deletion_journal_steps::table.find((*id.as_uuid(), position)))
            .set(deletion_journal_steps::status.eq(status.as_str()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(())
    }

    async fn finish(
        &self,
        id: &PlanId,
        resolution: PlanResolution,
    ) -> Result<(), DeletionJournalError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;
        let target = deletion_journal::table.find(*id.as_uuid());
        let stored = deletion_journal::resolution.eq(Some(resolution.as_str()));

        let updated = if resolution.closes_plan() {
            diesel::update(target)
                .set((stored, deletion_journal::finished_at.eq(diesel::dsl::now)))
                .execute(&mut conn)
                .await
        } else {
            diesel::update(target).set(stored).execute(&mut conn).await
        };
        updated.map_err(diesel_error)?;

        Ok(())
    }

    async fn unfinished(&self) -> Result<Vec<JournaledPlan>, DeletionJournalError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let journals: Vec<JournalRow> = deletion_journal::table
            .filter(deletion_journal::finished_at.is_null())
            .order(deletion_journal::created_at.asc())
            .select(JournalRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;
        if journals.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = journals.iter().map(|journal| journal.id).collect();
        let steps: Vec<JournalStepRow> = deletion_journal_steps::table
            .filter(deletion_journal_steps::journal_id.eq_any(&ids))
            .order((
                deletion_journal_steps::journal_id.asc(),
                deletion_journal_steps::position.asc(),
            ))
            .select(JournalStepRow::as_select())
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        assemble(journals, steps)
    }
}
