//! Shared wiring for integration tests: real domain services over the
//! in-memory adapters, with handles kept for inspection.

#![allow(dead_code, reason = "each test crate uses a different subset")]

pub mod embedded_postgres;

use std::sync::Arc;

use chrono::NaiveDate;
use mockable::DefaultClock;

use backend::domain::cascade::{CascadeDependencies, CascadePolicy, CascadingDeleteOrchestrator};
use backend::domain::ports::{CustomerRepository, InvoiceRepository};
use backend::domain::{
    AmountInCents, CredentialGate, CustomerDraft, CustomerId, CustomerService, ImageReference,
    InvoiceDraft, InvoiceId, InvoiceService, InvoiceStatus, UserService, ViewInvalidator,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::auth::RepositoryCredentialVerifier;
use backend::outbound::cache::InMemoryViewCache;
use backend::outbound::hashing::Sha256PasswordHasher;
use backend::outbound::memory::{
    InMemoryCustomerRepository, InMemoryDeletionJournal, InMemoryInvoiceRepository,
    InMemoryUserRepository, RecordingBlobStorage,
};

pub struct Harness {
    pub customers: Arc<InMemoryCustomerRepository>,
    pub invoices: Arc<InMemoryInvoiceRepository>,
    pub users: Arc<InMemoryUserRepository>,
    pub journal: Arc<InMemoryDeletionJournal>,
    pub blobs: Arc<RecordingBlobStorage>,
    pub views: Arc<InMemoryViewCache>,
    pub cascade: CascadingDeleteOrchestrator,
    pub invoice_service: InvoiceService,
    pub customer_service: CustomerService,
    pub user_service: UserService,
    pub login: CredentialGate,
}

impl Harness {
    pub fn new(policy: CascadePolicy) -> Self {
        let customers = Arc::new(InMemoryCustomerRepository::new());
        let invoices = Arc::new(InMemoryInvoiceRepository::new());
        let users = Arc::new(InMemoryUserRepository::new());
        let journal = Arc::new(InMemoryDeletionJournal::new());
        let blobs = Arc::new(RecordingBlobStorage::new());
        let views = Arc::new(InMemoryViewCache::new());
        let invalidator = ViewInvalidator::new(views.clone());
        let hasher = Arc::new(Sha256PasswordHasher::with_iterations(2));

        let cascade = CascadingDeleteOrchestrator::new(
            CascadeDependencies {
                customers: customers.clone(),
                invoices: invoices.clone(),
                blobs: blobs.clone(),
                journal: journal.clone(),
                views: invalidator.clone(),
            },
            policy,
        );

        Self {
            invoice_service: InvoiceService::new(
                invoices.clone(),
                invalidator.clone(),
                Arc::new(DefaultClock),
            ),
            customer_service: CustomerService::new(
                customers.clone(),
                blobs.clone(),
                cascade.clone(),
                invalidator.clone(),
            ),
            user_service: UserService::new(users.clone(), hasher.clone(), invalidator),
            login: CredentialGate::new(Arc::new(RepositoryCredentialVerifier::new(
                users.clone(),
                hasher,
            ))),
            customers,
            invoices,
            users,
            journal,
            blobs,
            views,
            cascade,
        }
    }

    pub fn http_state(&self) -> HttpState {
        HttpState::new(
            Arc::new(self.login.clone()),
            Arc::new(self.invoice_service.clone()),
            Arc::new(self.customer_service.clone()),
            Arc::new(self.user_service.clone()),
        )
    }

    pub async fn seed_customer(&self, image_url: &str) -> CustomerId {
        self.customers
            .create(&CustomerDraft {
                name: "Delba de Oliveira".to_owned(),
                email: "delba@oliveira.com".to_owned(),
                image: ImageReference::new(image_url),
            })
            .await
            .expect("seed customer")
    }

    pub async fn seed_invoice(&self, customer_id: CustomerId, cents: i32) -> InvoiceId {
        let draft = InvoiceDraft::new(
            customer_id,
            AmountInCents::new(cents).expect("positive amount"),
            InvoiceStatus::Pending,
        );
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).expect("valid date");
        self.invoices
            .create(&draft, date)
            .await
            .expect("seed invoice")
    }
}
