//! PostgreSQL-backed `CustomerRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{CustomerRepository, CustomerRepositoryError};
use crate::domain::{CustomerDraft, CustomerId, DeleteOutcome, ImageReference};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::CustomerValues;
use super::pool::{DbPool, PoolError};
use super::schema::customers;

/// Diesel-backed implementation of the `CustomerRepository` port.
#[derive(Clone)]
pub struct DieselCustomerRepository {
    pool: DbPool,
}

impl DieselCustomerRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> CustomerRepositoryError {
    map_pool_error(error, CustomerRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> CustomerRepositoryError {
    map_diesel_error(
        error,
        CustomerRepositoryError::query,
        CustomerRepositoryError::connection,
    )
}

fn values(draft: &CustomerDraft) -> CustomerValues<'_> {
    CustomerValues {
        name: &draft.name,
        email: &draft.email,
        image_url: draft.image.as_str(),
    }
}

#[async_trait]
impl CustomerRepository for DieselCustomerRepository {
    async fn create(&self, draft: &CustomerDraft) -> Result<CustomerId, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let id: uuid::Uuid = diesel::insert_into(customers::table)
            .values(values(draft))
            .returning(customers::id)
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(CustomerId::from_uuid(id))
    }

    async fn update(
        &self,
        id: &CustomerId,
        draft: &CustomerDraft,
    ) -> Result<(), CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::update(customers::table.find(*id.as_uuid()))
            .set(values(draft))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(())
    }

    async fn update_image(
        &self,
        id: &CustomerId,
        image: &ImageReference,
    ) -> Result<(), CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        diesel::update(customers::table.find(*id.as_uuid()))
            .set(customers::image_url.eq(image.as_str()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(())
    }

    async fn find_image(
        &self,
        id: &CustomerId,
    ) -> Result<Option<ImageReference>, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let image_url: Option<String> = customers::table
            .find(*id.as_uuid())
            .select(customers::image_url)
            .first(&mut conn)
            .await
            .optional()
            .map_err(diesel_error)?;

        Ok(image_url.map(ImageReference::new))
    }

    async fn delete(&self, id: &CustomerId) -> Result<DeleteOutcome, CustomerRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let affected = diesel::delete(customers::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(DeleteOutcome::from_affected_rows(affected))
    }
}
