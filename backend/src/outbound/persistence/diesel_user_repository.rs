//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.
//!
//! Emails are compared exactly as stored; the domain trims them before they
//! reach this adapter.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{DeleteOutcome, NewUser, PasswordHash, StoredCredentials, UserId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{CredentialsRow, UserValues};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the `UserRepository` port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> UserPersistenceError {
    map_pool_error(error, UserPersistenceError::connection)
}

fn diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn values(user: &NewUser) -> UserValues<'_> {
    UserValues {
        name: &user.name,
        email: &user.email,
        password: user.password_hash.as_str(),
    }
}

fn row_to_credentials(row: CredentialsRow) -> StoredCredentials {
    StoredCredentials {
        user_id: UserId::from_uuid(row.id),
        password_hash: PasswordHash::new(row.password),
    }
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(&self, user: &NewUser) -> Result<UserId, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let id: Uuid = diesel::insert_into(users::table)
            .values(values(user))
            .returning(users::id)
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(UserId::from_uuid(id))
    }

    async fn update(&self, id: &UserId, user: &NewUser) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::update(users::table.find(*id.as_uuid()))
            .set(values(user))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(())
    }

    async fn delete(&self, id: &UserId) -> Result<DeleteOutcome, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let affected = diesel::delete(users::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(DeleteOutcome::from_affected_rows(affected))
    }

    async fn count_by_email(
        &self,
        email: &str,
        excluding: Option<UserId>,
    ) -> Result<u64, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let mut query = users::table
            .filter(users::email.eq(email))
            .into_boxed::<diesel::pg::Pg>();
        if let Some(id) = excluding {
            query = query.filter(users::id.ne(*id.as_uuid()));
        }
        let count: i64 = query
            .count()
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;

        u64::try_from(count).map_err(|_| UserPersistenceError::query("negative row count"))
    }

    async fn find_credentials(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = users::table
            .filter(users::email.eq(email))
            .select(CredentialsRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        Ok(row.map(row_to_credentials))
    }
}
