//! In-memory `InvoiceRepository`.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::domain::ports::{InvoiceRepository, InvoiceRepositoryError};
use crate::domain::{CustomerId, DeleteOutcome, Invoice, InvoiceDraft, InvoiceId};

use super::lock;

#[derive(Debug, Default)]
struct State {
    rows: BTreeMap<InvoiceId, Invoice>,
    failure: Option<InvoiceRepositoryError>,
    failing_deletes: BTreeSet<InvoiceId>,
    deleted: Vec<InvoiceId>,
}

#[derive(Debug, Default)]
pub struct InMemoryInvoiceRepository {
    state: Mutex<State>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `error`.
    pub fn fail_with(&self, error: InvoiceRepositoryError) {
        lock(&self.state).failure = Some(error);
    }

    /// Make deletes of `id` fail while other statements succeed.
    pub fn fail_delete_of(&self, id: InvoiceId) {
        lock(&self.state).failing_deletes.insert(id);
    }

    /// Drop every injected fault.
    pub fn heal(&self) {
        let mut state = lock(&self.state);
        state.failure = None;
        state.failing_deletes.clear();
    }

    /// Stored row for `id`, if any.
    pub fn get(&self, id: &InvoiceId) -> Option<Invoice> {
        lock(&self.state).rows.get(id).cloned()
    }

    /// Number of stored invoices.
    pub fn len(&self) -> usize {
        lock(&self.state).rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Identifiers removed by successful deletes, in call order.
    pub fn deleted(&self) -> Vec<InvoiceId> {
        lock(&self.state).deleted.clone()
    }

    fn check(state: &State) -> Result<(), InvoiceRepositoryError> {
        state.failure.clone().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn create(
        &self,
        draft: &InvoiceDraft,
        date: NaiveDate,
    ) -> Result<InvoiceId, InvoiceRepositoryError> {
        let mut state = lock(&self.state);
        Self::check(&state)?;
        let id = InvoiceId::random();
        state.rows.insert(
            id,
            Invoice {
                id,
                customer_id: draft.customer_id(),
                amount: draft.amount(),
                status: draft.status(),
                date,
            },
        );
        Ok(id)
    }

    async fn update(
        &self,
        id: &InvoiceId,
        draft: &InvoiceDraft,
    ) -> Result<(), InvoiceRepositoryError> {
        let mut state = lock(&self.state);
        Self::check(&state)?;
        if let Some(row) = state.rows.get_mut(id) {
            row.customer_id = draft.customer_id();
            row.amount = draft.amount();
            row.status = draft.status();
        }
        Ok(())
    }

    async fn delete(&self, id: &InvoiceId) -> Result<DeleteOutcome, InvoiceRepositoryError> {
        let mut state = lock(&self.state);
        Self::check(&state)?;
        if state.failing_deletes.contains(id) {
            return Err(InvoiceRepositoryError::query("injected delete failure"));
        }
        match state.rows.remove(id) {
            Some(_) => {
                state.deleted.push(*id);
                Ok(DeleteOutcome::Deleted)
            }
            None => Ok(DeleteOutcome::NotFound),
        }
    }

    async fn list_ids_by_customer(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<InvoiceId>, InvoiceRepositoryError> {
        let state = lock(&self.state);
        Self::check(&state)?;
        let mut owned: Vec<&Invoice> = state
            .rows
            .values()
            .filter(|invoice| invoice.customer_id == *customer_id)
            .collect();
        owned.sort_by_key(|invoice| (invoice.date, invoice.id));
        Ok(owned.into_iter().map(|invoice| invoice.id).collect())
    }
}
