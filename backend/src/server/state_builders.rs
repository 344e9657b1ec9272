//! Wiring of driven adapters into the domain services.
//!
//! PostgreSQL adapters are used when a pool is configured; otherwise every
//! store is in memory, which suits local runs and smoke tests.

use std::sync::Arc;

use mockable::DefaultClock;

use backend::domain::cascade::{CascadeDependencies, CascadingDeleteOrchestrator};
use backend::domain::ports::{
    BlobStorage, CustomerRepository, DeletionJournal, InvoiceRepository, PasswordHasher,
    UserRepository,
};
use backend::domain::{
    CredentialGate, CustomerService, InvoiceService, UserService, ViewInvalidator,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::auth::RepositoryCredentialVerifier;
use backend::outbound::blob::HttpBlobStorage;
use backend::outbound::cache::InMemoryViewCache;
use backend::outbound::hashing::Sha256PasswordHasher;
use backend::outbound::memory::{
    InMemoryCustomerRepository, InMemoryDeletionJournal, InMemoryInvoiceRepository,
    InMemoryUserRepository, RecordingBlobStorage,
};
use backend::outbound::persistence::{
    DieselCustomerRepository, DieselDeletionJournal, DieselInvoiceRepository,
    DieselUserRepository,
};
use tracing::warn;

use super::ServerConfig;

/// Driven adapters selected for this process.
struct Stores {
    customers: Arc<dyn CustomerRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    users: Arc<dyn UserRepository>,
    journal: Arc<dyn DeletionJournal>,
}

fn build_stores(config: &ServerConfig) -> Stores {
    match &config.db_pool {
        Some(pool) => Stores {
            customers: Arc::new(DieselCustomerRepository::new(pool.clone())),
            invoices: Arc::new(DieselInvoiceRepository::new(pool.clone())),
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            journal: Arc::new(DieselDeletionJournal::new(pool.clone())),
        },
        None => {
            warn!("no database configured; using in-memory storage");
            Stores {
                customers: Arc::new(InMemoryCustomerRepository::new()),
                invoices: Arc::new(InMemoryInvoiceRepository::new()),
                users: Arc::new(InMemoryUserRepository::new()),
                journal: Arc::new(InMemoryDeletionJournal::new()),
            }
        }
    }
}

fn build_blob_storage(config: &ServerConfig) -> std::io::Result<Arc<dyn BlobStorage>> {
    match &config.blob_api {
        Some(api) => {
            let storage = HttpBlobStorage::new(&api.base_url, api.api_key.clone(), api.timeout)
                .map_err(|err| std::io::Error::other(format!("blob storage setup failed: {err}")))?;
            Ok(Arc::new(storage))
        }
        None => {
            warn!("no blob API configured; image deletions are only recorded");
            Ok(Arc::new(RecordingBlobStorage::new()))
        }
    }
}

/// Services shared by the HTTP workers plus the orchestrator used for
/// start-up recovery.
pub struct AppServices {
    pub http_state: HttpState,
    pub cascade: CascadingDeleteOrchestrator,
}

/// Build every domain service from the configured adapters.
///
/// # Errors
///
/// Returns [`std::io::Error`] when the blob API client cannot be built.
pub fn build_services(config: &ServerConfig) -> std::io::Result<AppServices> {
    let Stores {
        customers,
        invoices,
        users,
        journal,
    } = build_stores(config);
    let blobs = build_blob_storage(config)?;
    let views = ViewInvalidator::new(Arc::new(InMemoryViewCache::new()));
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Sha256PasswordHasher::default());

    let cascade = CascadingDeleteOrchestrator::new(
        CascadeDependencies {
            customers: Arc::clone(&customers),
            invoices: Arc::clone(&invoices),
            blobs: Arc::clone(&blobs),
            journal,
            views: views.clone(),
        },
        config.cascade_policy,
    );

    let login = CredentialGate::new(Arc::new(RepositoryCredentialVerifier::new(
        Arc::clone(&users),
        Arc::clone(&hasher),
    )));
    let invoice_service = InvoiceService::new(invoices, views.clone(), Arc::new(DefaultClock));
    let customer_service = CustomerService::new(customers, blobs, cascade.clone(), views.clone());
    let user_service = UserService::new(users, hasher, views);

    Ok(AppServices {
        http_state: HttpState::new(
            Arc::new(login),
            Arc::new(invoice_service),
            Arc::new(customer_service),
            Arc::new(user_service),
        ),
        cascade,
    })
}
