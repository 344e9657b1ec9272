//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Customers billed by invoices.
    customers (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        /// Profile image URL or the bundled placeholder path.
        image_url -> Varchar,
    }
}

diesel::table! {
    invoices (id) {
        id -> Uuid,
        customer_id -> Uuid,
        /// Amount in whole cents.
        amount -> Int4,
        status -> Varchar,
        date -> Date,
    }
}

diesel::table! {
    /// Dashboard operator accounts.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Text,
        /// Encoded one-way hash, never plaintext.
        password -> Text,
    }
}

diesel::table! {
    /// One row per cascading customer delete.
    deletion_journal (id) {
        id -> Uuid,
        customer_id -> Uuid,
        resolution -> Nullable<Varchar>,
        created_at -> Timestamptz,
        finished_at -> Nullable<Timestamptz>,
    }
}

diesel::table! {
    deletion_journal_steps (journal_id, position) {
        journal_id -> Uuid,
        position -> Int4,
        step -> Jsonb,
        status -> Varchar,
    }
}

diesel::joinable!(deletion_journal_steps -> deletion_journal (journal_id));

diesel::allow_tables_to_appear_in_same_query!(
    customers,
    invoices,
    users,
    deletion_journal,
    deletion_journal_steps,
);
