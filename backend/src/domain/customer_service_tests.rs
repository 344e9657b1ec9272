//! Tests for the customer service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::cascade::{CascadeDependencies, CascadePolicy};
use crate::domain::ports::{
    BlobStorageError, CustomerRepositoryError, MockBlobStorage, MockCustomerRepository,
    MockDeletionJournal, MockInvoiceRepository, MockViewCache,
};
use crate::domain::{BlobKey, DeleteOutcome, ErrorCode, InvoiceId};

struct Harness {
    customers: MockCustomerRepository,
    invoices: MockInvoiceRepository,
    blobs: MockBlobStorage,
    journal: MockDeletionJournal,
    views: MockViewCache,
}

impl Harness {
    fn new() -> Self {
        let mut views = MockViewCache::new();
        views.expect_mark_stale().return_const(());
        Self {
            customers: MockCustomerRepository::new(),
            invoices: MockInvoiceRepository::new(),
            blobs: MockBlobStorage::new(),
            journal: MockDeletionJournal::new(),
            views,
        }
    }

    fn build(self) -> CustomerService {
        let customers: Arc<dyn CustomerRepository> = Arc::new(self.customers);
        let blobs: Arc<dyn BlobStorage> = Arc::new(self.blobs);
        let views = ViewInvalidator::new(Arc::new(self.views));
        let cascade = CascadingDeleteOrchestrator::new(
            CascadeDependencies {
                customers: Arc::clone(&customers),
                invoices: Arc::new(self.invoices),
                blobs: Arc::clone(&blobs),
                journal: Arc::new(self.journal),
                views: views.clone(),
            },
            CascadePolicy::BestEffort,
        );
        CustomerService::new(customers, blobs, cascade, views)
    }
}

fn customer_form(name: &str, email: &str, image_url: &str) -> FormFields {
    FormFields::from_pairs([("name", name), ("email", email), ("image_url", image_url)])
}

#[rstest]
#[tokio::test]
async fn create_redirects_to_customer_list() {
    let mut harness = Harness::new();
    harness
        .customers
        .expect_create()
        .withf(|draft| draft.name == "Lee Robinson" && draft.email == "lee@robinson.com")
        .times(1)
        .return_once(|_| Ok(CustomerId::random()));

    let outcome = harness
        .build()
        .create_customer(&customer_form(
            "Lee Robinson",
            "lee@robinson.com",
            "/customers/profile-default.png",
        ))
        .await
        .expect("create succeeds");

    let MutationOutcome::Success(Some(navigation)) = outcome else {
        panic!("expected redirect");
    };
    assert_eq!(navigation.path(), "/dashboard/customers");
}

#[rstest]
#[tokio::test]
async fn invalid_customer_reports_fields_and_summary() {
    let mut harness = Harness::new();
    harness.customers.expect_create().times(0);

    let outcome = harness
        .build()
        .create_customer(&customer_form("", "lee", "https://host/img"))
        .await
        .expect("validation failures are not fatal");

    let MutationOutcome::Failure(state) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(state.summary(), Some("Missing Fields. Failed to Create Customer."));
    assert_eq!(state.errors().fields().collect::<Vec<_>>(), ["email", "name"]);
}

#[rstest]
#[tokio::test]
async fn update_fault_is_recoverable() {
    let mut harness = Harness::new();
    harness
        .customers
        .expect_update()
        .times(1)
        .return_once(|_, _| Err(CustomerRepositoryError::query("unique violation")));

    let outcome = harness
        .build()
        .update_customer(
            &CustomerId::random(),
            &customer_form("Lee", "lee@robinson.com", "https://host/img"),
        )
        .await
        .expect("storage fault on update is recoverable");

    assert_eq!(
        outcome,
        MutationOutcome::Failure(FormState::message("Database Error: Failed to Update Customer."))
    );
}

#[rstest]
#[tokio::test]
async fn profile_update_discards_previous_upload() {
    let id = CustomerId::random();
    let mut harness = Harness::new();
    harness
        .customers
        .expect_find_image()
        .with(eq(id))
        .times(1)
        .return_once(|_| Ok(Some(ImageReference::new("https://host/old-key"))));
    harness
        .customers
        .expect_update_image()
        .withf(move |target, image| *target == id && image.as_str() == "https://host/new-key")
        .times(1)
        .return_once(|_, _| Ok(()));
    harness
        .blobs
        .expect_delete_files()
        .withf(|keys| keys.iter().map(BlobKey::as_str).eq(["old-key"]))
        .times(1)
        .return_once(|_| Ok(()));

    let outcome = harness
        .build()
        .update_customer_profile(
            &id,
            &FormFields::from_pairs([("image_url", "https://host/new-key")]),
        )
        .await
        .expect("profile update succeeds");

    assert_eq!(outcome, MutationOutcome::done());
}

#[rstest]
#[case::placeholder(Some(crate::domain::DEFAULT_PROFILE_IMAGE))]
#[case::unchanged(Some("https://host/new-key"))]
#[case::missing(None)]
#[tokio::test]
async fn profile_update_keeps_blobs_that_are_not_stale(#[case] previous: Option<&'static str>) {
    let mut harness = Harness::new();
    harness
        .customers
        .expect_find_image()
        .times(1)
        .return_once(move |_| Ok(previous.map(ImageReference::new)));
    harness
        .customers
        .expect_update_image()
        .times(1)
        .return_once(|_, _| Ok(()));
    harness.blobs.expect_delete_files().times(0);

    let outcome = harness
        .build()
        .update_customer_profile(
            &CustomerId::random(),
            &FormFields::from_pairs([("image_url", "https://host/new-key")]),
        )
        .await
        .expect("profile update succeeds");

    assert!(outcome.is_success());
}

#[rstest]
#[tokio::test]
async fn profile_update_failure_uses_profile_message() {
    let mut harness = Harness::new();
    harness
        .customers
        .expect_find_image()
        .times(1)
        .return_once(|_| Ok(None));
    harness
        .customers
        .expect_update_image()
        .times(1)
        .return_once(|_, _| Err(CustomerRepositoryError::connection("refused")));
    harness.blobs.expect_delete_files().times(0);

    let outcome = harness
        .build()
        .update_customer_profile(
            &CustomerId::random(),
            &FormFields::from_pairs([("image_url", "https://host/new-key")]),
        )
        .await
        .expect("storage fault is recoverable");

    assert_eq!(
        outcome,
        MutationOutcome::Failure(FormState::message(
            "Database Error: Failed to Update Customer profile."
        ))
    );
}

#[rstest]
#[tokio::test]
async fn profile_blob_failure_is_fatal() {
    let mut harness = Harness::new();
    harness
        .customers
        .expect_find_image()
        .times(1)
        .return_once(|_| Ok(Some(ImageReference::new("https://host/old-key"))));
    harness
        .customers
        .expect_update_image()
        .times(1)
        .return_once(|_, _| Ok(()));
    harness
        .blobs
        .expect_delete_files()
        .times(1)
        .return_once(|_| Err(BlobStorageError::transport("connection reset")));

    let error = harness
        .build()
        .update_customer_profile(
            &CustomerId::random(),
            &FormFields::from_pairs([("image_url", "https://host/new-key")]),
        )
        .await
        .expect_err("blob failures outside a cascade are fatal");

    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[tokio::test]
async fn delete_runs_the_cascade() {
    let id = CustomerId::random();
    let invoice = InvoiceId::random();
    let mut harness = Harness::new();
    harness
        .invoices
        .expect_list_ids_by_customer()
        .times(1)
        .return_once(move |_| Ok(vec![invoice]));
    harness
        .customers
        .expect_find_image()
        .times(1)
        .return_once(|_| Ok(None));
    harness.journal.expect_begin().returning(|_| Ok(()));
    harness.journal.expect_mark_step().returning(|_, _, _| Ok(()));
    harness.journal.expect_finish().returning(|_, _| Ok(()));
    harness
        .invoices
        .expect_delete()
        .with(eq(invoice))
        .times(1)
        .return_once(|_| Ok(DeleteOutcome::Deleted));
    harness
        .customers
        .expect_delete()
        .with(eq(id))
        .times(1)
        .return_once(|_| Ok(DeleteOutcome::Deleted));

    let outcome = harness.build().delete_customer(&id).await.expect("delete succeeds");

    assert_eq!(outcome, MutationOutcome::done());
}
