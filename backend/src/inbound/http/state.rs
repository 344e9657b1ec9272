//! Shared HTTP adapter state.
//!
//! Handlers receive this via `actix_web::web::Data` so they depend only on
//! driving ports and stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{CustomerCommand, InvoiceCommand, LoginService, UserCommand};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub login: Arc<dyn LoginService>,
    pub invoices: Arc<dyn InvoiceCommand>,
    pub customers: Arc<dyn CustomerCommand>,
    pub users: Arc<dyn UserCommand>,
}

impl HttpState {
    /// # Examples
    /// ```no_run
    /// use std::sync::Arc;
    ///
    /// use backend::domain::ports::{CustomerCommand, InvoiceCommand, LoginService, UserCommand};
    /// use backend::inbound::http::state::HttpState;
    ///
    /// fn build(
    ///     login: Arc<dyn LoginService>,
    ///     invoices: Arc<dyn InvoiceCommand>,
    ///     customers: Arc<dyn CustomerCommand>,
    ///     users: Arc<dyn UserCommand>,
    /// ) -> HttpState {
    ///     HttpState::new(login, invoices, customers, users)
    /// }
    /// ```
    pub fn new(
        login: Arc<dyn LoginService>,
        invoices: Arc<dyn InvoiceCommand>,
        customers: Arc<dyn CustomerCommand>,
        users: Arc<dyn UserCommand>,
    ) -> Self {
        Self {
            login,
            invoices,
            customers,
            users,
        }
    }
}
