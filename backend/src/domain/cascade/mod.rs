//! Cascading customer deletion.
//!
//! Removing a customer touches three stores that cannot share a
//! transaction: invoice rows, the uploaded profile image in blob storage and
//! the customer row itself. The orchestrator
//!
//! 1. derives a [`DeletionPlan`] from the customer's invoices and image,
//! 2. journals the plan before anything is deleted,
//! 3. runs the steps in order, recording each outcome,
//! 4. deletes the customer row last,
//! 5. resolves the journal entry and marks the customer list stale.
//!
//! Under [`CascadePolicy::Strict`] the first failed step ends the run: no
//! later step executes and the customer row is kept. Under
//! [`CascadePolicy::BestEffort`] failed steps are recorded and the customer
//! is deleted anyway; the plan is resolved as
//! [`PlanResolution::CompletedWithFailures`] and stays open.
//!
//! Plans left open, by a crash between 2 and 5 or by failed best-effort
//! steps, are replayed by [`CascadingDeleteOrchestrator::resume_unfinished`]
//! at start-up. Every step is idempotent, so replays are safe.

mod plan;

use std::sync::Arc;

use serde_json::json;
use tracing::{info, warn};

pub use plan::{
    CascadePolicy, DeletionPlan, DeletionReport, DeletionStep, JournaledPlan, PlanId,
    PlanResolution, StepFailure, StepStatus,
};

use super::ports::{BlobStorage, CustomerRepository, DeletionJournal, InvoiceRepository};
use super::storage_faults::{map_customer_error, map_invoice_error, map_journal_error};
use super::{BlobKey, CachedView, CustomerId, DeleteOutcome, Error, InvoiceId, ViewInvalidator};

/// Storage and collaborators used by [`CascadingDeleteOrchestrator`].
#[derive(Clone)]
pub struct CascadeDependencies {
    pub customers: Arc<dyn CustomerRepository>,
    pub invoices: Arc<dyn InvoiceRepository>,
    pub blobs: Arc<dyn BlobStorage>,
    pub journal: Arc<dyn DeletionJournal>,
    pub views: ViewInvalidator,
}

/// Sequences dependent cleanup ahead of the customer row delete.
#[derive(Clone)]
pub struct CascadingDeleteOrchestrator {
    deps: CascadeDependencies,
    policy: CascadePolicy,
}

impl CascadingDeleteOrchestrator {
    /// Create an orchestrator applying `policy` to step failures.
    pub fn new(deps: CascadeDependencies, policy: CascadePolicy) -> Self {
        Self { deps, policy }
    }

    /// Policy applied to step failures.
    pub fn policy(&self) -> CascadePolicy {
        self.policy
    }

    /// Delete `customer_id` and everything that hangs off it.
    ///
    /// Planning and journaling failures abort before anything is removed.
    /// Dependent step failures are collected in the report, or end the run
    /// under the strict policy; the customer row delete itself is fatal on
    /// failure.
    pub async fn delete_customer(&self, customer_id: &CustomerId) -> Result<DeletionReport, Error> {
        let plan = self.plan(customer_id).await?;
        self.deps
            .journal
            .begin(&plan)
            .await
            .map_err(map_journal_error)?;
        let statuses = vec![StepStatus::Pending; plan.steps().len()];
        self.execute(&plan, &statuses, false).await
    }

    /// Replay plans left open by an interrupted delete.
    ///
    /// Returns how many plans were replayed without a fatal error. A replay
    /// that still has failed steps leaves its plan open for the next start.
    pub async fn resume_unfinished(&self) -> Result<usize, Error> {
        let pending = self
            .deps
            .journal
            .unfinished()
            .await
            .map_err(map_journal_error)?;
        let mut resumed = 0;
        for journaled in pending {
            let customer_removed = journaled.customer_removed();
            let JournaledPlan { plan, statuses, .. } = journaled;
            match self.execute(&plan, &statuses, customer_removed).await {
                Ok(report) => {
                    resumed += 1;
                    info!(
                        plan_id = %plan.id(),
                        customer_id = %report.customer_id,
                        failures = report.failures.len(),
                        "resumed interrupted customer deletion"
                    );
                }
                Err(error) => warn!(
                    plan_id = %plan.id(),
                    customer_id = %plan.customer_id(),
                    %error,
                    "could not resume customer deletion"
                ),
            }
        }
        Ok(resumed)
    }

    async fn plan(&self, customer_id: &CustomerId) -> Result<DeletionPlan, Error> {
        let invoice_ids = self
            .deps
            .invoices
            .list_ids_by_customer(customer_id)
            .await
            .map_err(map_invoice_error)?;
        let image = self
            .deps
            .customers
            .find_image(customer_id)
            .await
            .map_err(map_customer_error)?;
        Ok(DeletionPlan::build(
            PlanId::random(),
            *customer_id,
            invoice_ids,
            image.as_ref(),
        ))
    }

    // Once the customer row is gone there is nothing left for the strict
    // policy to protect, so remaining steps run best effort.
    async fn execute(
        &self,
        plan: &DeletionPlan,
        statuses: &[StepStatus],
        customer_removed: bool,
    ) -> Result<DeletionReport, Error> {
        let halt_on_failure = self.policy == CascadePolicy::Strict && !customer_removed;
        let mut report = DeletionReport::new(plan.customer_id());
        for (index, step) in plan.steps().iter().enumerate() {
            if statuses.get(index) == Some(&StepStatus::Done) {
                continue;
            }
            match self.run_step(step, &mut report).await {
                Ok(()) => self.mark_step(plan.id(), index, StepStatus::Done).await,
                Err(reason) => {
                    warn!(
                        customer_id = %plan.customer_id(),
                        ?step,
                        %reason,
                        "customer deletion step failed"
                    );
                    report.failures.push(StepFailure {
                        step: step.clone(),
                        reason,
                    });
                    self.mark_step(plan.id(), index, StepStatus::Failed).await;
                    if halt_on_failure {
                        break;
                    }
                }
            }
        }

        if report.invoices_deleted > 0 {
            self.deps.views.invalidate(CachedView::InvoiceList);
        }

        if halt_on_failure && !report.is_clean() {
            self.finish(plan.id(), PlanResolution::Aborted).await;
            return Err(Self::aborted(&report));
        }

        let outcome = self
            .deps
            .customers
            .delete(&plan.customer_id())
            .await
            .map_err(map_customer_error)?;
        report.customer = Some(outcome);
        let resolution = if report.is_clean() {
            PlanResolution::Completed
        } else {
            PlanResolution::CompletedWithFailures
        };
        self.finish(plan.id(), resolution).await;
        self.deps.views.invalidate(CachedView::CustomerList);

        info!(
            customer_id = %report.customer_id,
            invoices_deleted = report.invoices_deleted,
            invoices_missing = report.invoices_missing,
            blobs_deleted = report.blobs_deleted,
            failures = report.failures.len(),
            "customer deleted"
        );
        Ok(report)
    }

    async fn run_step(&self, step: &DeletionStep, report: &mut DeletionReport) -> Result<(), String> {
        match step {
            DeletionStep::DeleteInvoice { invoice_id } => {
                self.delete_invoice(invoice_id, report).await
            }
            DeletionStep::DeleteBlobs { keys } => self.delete_blobs(keys, report).await,
        }
    }

    async fn delete_invoice(
        &self,
        invoice_id: &InvoiceId,
        report: &mut DeletionReport,
    ) -> Result<(), String> {
        match self.deps.invoices.delete(invoice_id).await {
            Ok(DeleteOutcome::Deleted) => {
                report.invoices_deleted += 1;
                Ok(())
            }
            Ok(DeleteOutcome::NotFound) => {
                report.invoices_missing += 1;
                Ok(())
            }
            Err(error) => Err(error.to_string()),
        }
    }

    async fn delete_blobs(&self, keys: &[BlobKey], report: &mut DeletionReport) -> Result<(), String> {
        if keys.is_empty() {
            return Ok(());
        }
        self.deps
            .blobs
            .delete_files(keys)
            .await
            .map_err(|error| error.to_string())?;
        report.blobs_deleted += keys.len();
        Ok(())
    }

    // Journal bookkeeping after the plan is begun is advisory: a missed mark
    // only means a replay repeats an idempotent step.
    async fn mark_step(&self, id: PlanId, index: usize, status: StepStatus) {
        if let Err(error) = self.deps.journal.mark_step(&id, index, status).await {
            warn!(plan_id = %id, index, %error, "could not record deletion step");
        }
    }

    async fn finish(&self, id: PlanId, resolution: PlanResolution) {
        if let Err(error) = self.deps.journal.finish(&id, resolution).await {
            warn!(plan_id = %id, %error, "could not close deletion plan");
        }
    }

    fn aborted(report: &DeletionReport) -> Error {
        Error::conflict("customer was not deleted because dependent cleanup failed").with_details(
            json!({
                "customerId": report.customer_id,
                "invoicesDeleted": report.invoices_deleted,
                "failures": report.failures,
                "code": "cascade_aborted",
            }),
        )
    }
}
