//! HTTP inbound adapter: form-encoded mutation endpoints, sign-in and health checks.

pub mod auth;
pub mod customers;
pub mod error;
pub mod form;
pub mod health;
pub mod invoices;
pub mod schemas;
pub mod session;
pub mod session_key;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;

pub use error::ApiResult;
