//! In-memory `CustomerRepository`.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{CustomerRepository, CustomerRepositoryError};
use crate::domain::{Customer, CustomerDraft, CustomerId, DeleteOutcome, ImageReference};

use super::lock;

#[derive(Debug, Default)]
struct State {
    rows: BTreeMap<CustomerId, Customer>,
    failure: Option<CustomerRepositoryError>,
    deletes: usize,
}

#[derive(Debug, Default)]
pub struct InMemoryCustomerRepository {
    state: Mutex<State>,
}

impl InMemoryCustomerRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `error`.
    pub fn fail_with(&self, error: CustomerRepositoryError) {
        lock(&self.state).failure = Some(error);
    }

    /// Stored row for `id`, if any.
    pub fn get(&self, id: &CustomerId) -> Option<Customer> {
        lock(&self.state).rows.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        lock(&self.state).rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of delete statements issued, including misses.
    pub fn delete_calls(&self) -> usize {
        lock(&self.state).deletes
    }

    fn check(state: &State) -> Result<(), CustomerRepositoryError> {
        state.failure.clone().map_or(Ok(()), Err)
    }
}

#[async_trait]
impl CustomerRepository for InMemoryCustomerRepository {
    async fn create(&self, draft: &CustomerDraft) -> Result<CustomerId, CustomerRepositoryError> {
        let mut state = lock(&self.state);
        Self::check(&state)?;
        let id = CustomerId::random();
        state.rows.insert(
            id,
            Customer {
                id,
                name: draft.name.clone(),
                email: draft.email.clone(),
                image_url: draft.image.clone(),
            },
        );
        Ok(id)
    }

    async fn update(
        &self,
        id: &CustomerId,
        draft: &CustomerDraft,
    ) -> Result<(), CustomerRepositoryError> {
        let mut state = lock(&self.state);
        Self::check(&state)?;
        if let Some(row) = state.rows.get_mut(id) {
            row.name.clone_from(&draft.name);
            row.email.clone_from(&draft.email);
            row.image_url = draft.image.clone();
        }
        Ok(())
    }

    async fn update_image(
        &self,
        id: &CustomerId,
        image: &ImageReference,
    ) -> Result<(), CustomerRepositoryError> {
        let mut state = lock(&self.state);
        Self::check(&state)?;
        if let Some(row) = state.rows.get_mut(id) {
            row.image_url = image.clone();
        }
        Ok(())
    }

    async fn find_image(
        &self,
        id: &CustomerId,
    ) -> Result<Option<ImageReference>, CustomerRepositoryError> {
        let state = lock(&self.state);
        Self::check(&state)?;
        Ok(state.rows.get(id).map(|row| row.image_url.clone()))
    }

    async fn delete(&self, id: &CustomerId) -> Result<DeleteOutcome, CustomerRepositoryError> {
        let mut state = lock(&self.state);
        Self::check(&state)?;
        state.deletes += 1;
        Ok(match state.rows.remove(id) {
            Some(_) => DeleteOutcome::Deleted,
            None => DeleteOutcome::NotFound,
        })
    }
}
