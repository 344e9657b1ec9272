//! In-memory `UserRepository`.

use std::collections::BTreeMap;
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{DeleteOutcome, NewUser, StoredCredentials, User, UserId};

use super::lock;

#[derive(Debug, Default)]
struct State {
    rows: BTreeMap<UserId, NewUser>,
    failure: Option<UserPersistenceError>,
}

/// Mirrors the unique index on `users.email`: inserting a duplicate fails.
#[derive(Debug, Default)]
pub struct InMemoryUserRepository {
    state: Mutex<State>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail with `error`.
    pub fn fail_with(&self, error: UserPersistenceError) {
        lock(&self.state).failure = Some(error);
    }

    /// Stored user for `id`, without credentials.
    pub fn get(&self, id: &UserId) -> Option<User> {
        lock(&self.state).rows.get(id).map(|row| User {
            id: *id,
            name: row.name.clone(),
            email: row.email.clone(),
        })
    }

    /// Stored hash for `id`, for asserting plaintext never reaches storage.
    pub fn stored_hash(&self, id: &UserId) -> Option<String> {
        lock(&self.state)
            .rows
            .get(id)
            .map(|row| row.password_hash.as_str().to_owned())
    }

    pub fn len(&self) -> usize {
        lock(&self.state).rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check(state: &State) -> Result<(), UserPersistenceError> {
        state.failure.clone().map_or(Ok(()), Err)
    }

    fn email_taken(state: &State, email: &str, excluding: Option<UserId>) -> bool {
        state
            .rows
            .iter()
            .any(|(id, row)| row.email == email && Some(*id) != excluding)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &NewUser) -> Result<UserId, UserPersistenceError> {
        let mut state = lock(&self.state);
        Self::check(&state)?;
        if Self::email_taken(&state, &user.email, None) {
            return Err(UserPersistenceError::query("unique constraint violated"));
        }
        let id = UserId::random();
        state.rows.insert(id, user.clone());
        Ok(id)
    }

    async fn update(&self, id: &UserId, user: &NewUser) -> Result<(), UserPersistenceError> {
        let mut state = lock(&self.state);
        Self::check(&state)?;
        if Self::email_taken(&state, &user.email, Some(*id)) {
            return Err(UserPersistenceError::query("unique constraint violated"));
        }
        if let Some(row) = state.rows.get_mut(id) {
            *row = user.clone();
        }
        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<DeleteOutcome, UserPersistenceError> {
        let mut state = lock(&self.state);
        Self::check(&state)?;
        Ok(match state.rows.remove(id) {
            Some(_) => DeleteOutcome::Deleted,
            None => DeleteOutcome::NotFound,
        })
    }

    async fn count_by_email(
        &self,
        email: &str,
        excluding: Option<UserId>,
    ) -> Result<u64, UserPersistenceError> {
        let state = lock(&self.state);
        Self::check(&state)?;
        let count = state
            .rows
            .iter()
            .filter(|(id, row)| row.email == email && Some(**id) != excluding)
            .count();
        Ok(count as u64)
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let state = lock(&self.state);
        Self::check(&state)?;
        Ok(state
            .rows
            .iter()
            .find(|(_, row)| row.email == email)
            .map(|(id, row)| StoredCredentials {
                user_id: *id,
                password_hash: row.password_hash.clone(),
            }))
    }
}
