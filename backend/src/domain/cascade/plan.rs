//! Deletion plans, step bookkeeping and the report handed back to callers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{BlobKey, CustomerId, DeleteOutcome, ImageReference, InvoiceId};

/// Identifier of one journaled deletion plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlanId(Uuid);

impl PlanId {
    /// Generate a fresh identifier for a plan about to be journaled.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an identifier read back from storage.
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Access the underlying UUID.
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One dependent cleanup action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DeletionStep {
    /// Remove one invoice row owned by the customer.
    DeleteInvoice { invoice_id: InvoiceId },
    /// Remove uploaded files from the blob store in one batched call.
    DeleteBlobs { keys: Vec<BlobKey> },
}

/// Progress of a step as recorded in the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    /// Not attempted yet.
    Pending,
    /// Completed; replays skip it.
    Done,
    /// Attempted and failed; replays retry it.
    Failed,
}

impl StepStatus {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
            Self::Failed => "failed",
        }
    }
}

impl FromStr for StepStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "done" => Ok(Self::Done),
            "failed" => Ok(Self::Failed),
            other => Err(format!("unknown step status: {other}")),
        }
    }
}

/// How a journaled plan was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanResolution {
    /// Every step succeeded and the customer row is gone.
    Completed,
    /// The customer row is gone but some steps failed. The plan stays open
    /// so a later replay can retry them.
    CompletedWithFailures,
    /// Strict policy refused to delete the customer after a step failed.
    Aborted,
}

impl PlanResolution {
    /// Storage representation.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Completed => "completed",
            Self::CompletedWithFailures => "completed_with_failures",
            Self::Aborted => "aborted",
        }
    }

    /// True when the plan needs no further replay.
    pub const fn closes_plan(self) -> bool {
        !matches!(self, Self::CompletedWithFailures)
    }
}

impl FromStr for PlanResolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "completed" => Ok(Self::Completed),
            "completed_with_failures" => Ok(Self::CompletedWithFailures),
            "aborted" => Ok(Self::Aborted),
            other => Err(format!("unknown plan resolution: {other}")),
        }
    }
}

/// Ordered cleanup for one customer: invoice rows first, then blobs.
///
/// # Examples
/// ```
/// use backend::domain::cascade::{DeletionPlan, DeletionStep, PlanId};
/// use backend::domain::{CustomerId, ImageReference, InvoiceId};
///
/// let invoices = vec![InvoiceId::random(), InvoiceId::random()];
/// let image = ImageReference::new("https://host/img123");
/// let plan = DeletionPlan::build(PlanId::random(), CustomerId::random(), invoices, Some(&image));
///
/// assert_eq!(plan.steps().len(), 3);
/// assert!(matches!(plan.steps()[2], DeletionStep::DeleteBlobs { .. }));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionPlan {
    id: PlanId,
    customer_id: CustomerId,
    steps: Vec<DeletionStep>,
}

impl DeletionPlan {
    /// Derive the plan from the customer's invoices and image reference.
    pub fn build(
        id: PlanId,
        customer_id: CustomerId,
        invoice_ids: Vec<InvoiceId>,
        image: Option<&ImageReference>,
    ) -> Self {
        let mut steps: Vec<DeletionStep> = invoice_ids
            .into_iter()
            .map(|invoice_id| DeletionStep::DeleteInvoice { invoice_id })
            .collect();
        if let Some(key) = image.and_then(ImageReference::blob_key) {
            steps.push(DeletionStep::DeleteBlobs { keys: vec![key] });
        }
        Self {
            id,
            customer_id,
            steps,
        }
    }

    /// Rebuild a plan read back from the journal.
    pub fn restore(id: PlanId, customer_id: CustomerId, steps: Vec<DeletionStep>) -> Self {
        Self {
            id,
            customer_id,
            steps,
        }
    }

    /// Journal identifier of this plan.
    pub fn id(&self) -> PlanId {
        self.id
    }

    /// Customer whose row is deleted once the steps have run.
    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    /// Steps in execution order.
    pub fn steps(&self) -> &[DeletionStep] {
        &self.steps
    }
}

/// Unfinished plan plus the last recorded status of each step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JournaledPlan {
    pub plan: DeletionPlan,
    /// One entry per step, in plan order.
    pub statuses: Vec<StepStatus>,
    /// `None` while the first run has not finished.
    pub resolution: Option<PlanResolution>,
}

impl JournaledPlan {
    /// True once an earlier run already removed the customer row.
    pub fn customer_removed(&self) -> bool {
        self.resolution == Some(PlanResolution::CompletedWithFailures)
    }
}

/// Whether dependent cleanup failures block the customer delete.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CascadePolicy {
    /// Log failed steps and delete the customer anyway.
    #[default]
    BestEffort,
    /// Stop at the first failed step and keep the customer.
    Strict,
}

impl FromStr for CascadePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "best_effort" => Ok(Self::BestEffort),
            "strict" => Ok(Self::Strict),
            other => Err(format!(
                "unknown cascade policy `{other}` (expected best_effort or strict)"
            )),
        }
    }
}

/// A step that did not complete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepFailure {
    pub step: DeletionStep,
    /// Adapter error text.
    pub reason: String,
}

/// What a cascading delete actually did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionReport {
    pub customer_id: CustomerId,
    /// Invoice rows removed by this run.
    pub invoices_deleted: usize,
    /// Invoice rows that were already gone.
    pub invoices_missing: usize,
    /// Blob keys accepted by blob storage.
    pub blobs_deleted: usize,
    /// Steps that failed, in the order they ran.
    pub failures: Vec<StepFailure>,
    /// Outcome of the customer row delete; `None` when it never ran.
    pub customer: Option<DeleteOutcome>,
}

impl DeletionReport {
    /// Empty report for `customer_id`.
    pub fn new(customer_id: CustomerId) -> Self {
        Self {
            customer_id,
            invoices_deleted: 0,
            invoices_missing: 0,
            blobs_deleted: 0,
            failures: Vec::new(),
            customer: None,
        }
    }

    /// True when every dependent step succeeded.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
