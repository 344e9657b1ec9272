//! PostgreSQL-backed `InvoiceRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{InvoiceRepository, InvoiceRepositoryError};
use crate::domain::{CustomerId, DeleteOutcome, InvoiceDraft, InvoiceId};

use super::diesel_error_mapping::{map_diesel_error, map_pool_error};
use super::models::{InvoiceUpdate, NewInvoiceRow};
use super::pool::{DbPool, PoolError};
use super::schema::invoices;

/// Diesel-backed implementation of the `InvoiceRepository` port.
#[derive(Clone)]
pub struct DieselInvoiceRepository {
    pool: DbPool,
}

impl DieselInvoiceRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn pool_error(error: PoolError) -> InvoiceRepositoryError {
    map_pool_error(error, InvoiceRepositoryError::connection)
}

fn diesel_error(error: diesel::result::Error) -> InvoiceRepositoryError {
    map_diesel_error(
        error,
        InvoiceRepositoryError::query,
        InvoiceRepositoryError::connection,
    )
}

#[async_trait]
impl InvoiceRepository for DieselInvoiceRepository {
    async fn create(
        &self,
        draft: &InvoiceDraft,
        date: NaiveDate,
    ) -> Result<InvoiceId, InvoiceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let row = NewInvoiceRow {
            customer_id: *draft.customer_id().as_uuid(),
            amount: draft.amount().cents(),
            status: draft.status().as_str(),
            date,
        };
        let id: Uuid = diesel::insert_into(invoices::table)
            .values(&row)
            .returning(invoices::id)
            .get_result(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(InvoiceId::from_uuid(id))
    }

    async fn update(
        &self,
        id: &InvoiceId,
        draft: &InvoiceDraft,
    ) -> Result<(), InvoiceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let changes = InvoiceUpdate {
            customer_id: *draft.customer_id().as_uuid(),
            amount: draft.amount().cents(),
            status: draft.status().as_str(),
        };
        diesel::update(invoices::table.find(*id.as_uuid()))
            .set(&changes)
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(())
    }

    async fn delete(&self, id: &InvoiceId) -> Result<DeleteOutcome, InvoiceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let affected = diesel::delete(invoices::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(DeleteOutcome::from_affected_rows(affected))
    }

    async fn list_ids_by_customer(
        &self,
        customer_id: &CustomerId,
    ) -> Result<Vec<InvoiceId>, InvoiceRepositoryError> {
        let mut conn = self.pool.get().await.map_err(pool_error)?;

        let ids: Vec<Uuid> = invoices::table
            .filter(invoices::customer_id.eq(*customer_id.as_uuid()))
            .order((invoices::date.asc(), invoices::id.asc()))
            .select(invoices::id)
            .load(&mut conn)
            .await
            .map_err(diesel_error)?;

        Ok(ids.into_iter().map(InvoiceId::from_uuid).collect())
    }
}
