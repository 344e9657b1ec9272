//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and never
//! leave it.

use chrono::NaiveDate;
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{customers, deletion_journal, deletion_journal_steps, invoices, users};

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = customers)]
pub(crate) struct CustomerValues<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub image_url: &'a str,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = invoices)]
pub(crate) struct NewInvoiceRow<'a> {
    pub customer_id: Uuid,
    pub amount: i32,
    pub status: &'a str,
    pub date: NaiveDate,
}

/// Update leaves `date` untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = invoices)]
pub(crate) struct InvoiceUpdate<'a> {
    pub customer_id: Uuid,
    pub amount: i32,
    pub status: &'a str,
}

#[derive(Debug, Clone, Insertable, AsChangeset)]
#[diesel(table_name = users)]
pub(crate) struct UserValues<'a> {
    pub name: &'a str,
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct CredentialsRow {
    pub id: Uuid,
    pub password: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = deletion_journal)]
pub(crate) struct NewJournalRow {
    pub id: Uuid,
    pub customer_id: Uuid,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = deletion_journal)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct JournalRow {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub resolution: Option<String>,
}

#[derive(Debug, Clone, Insertable, Queryable, Selectable)]
#[diesel(table_name = deletion_journal_steps)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct JournalStepRow {
    pub journal_id: Uuid,
    pub position: i32,
    pub step: serde_json::Value,
    pub status: String,
}
