//! Validated mutations and sign-in over the in-memory adapters.

mod support;

use backend::domain::cascade::CascadePolicy;
use backend::domain::ports::{InvoiceCommand, InvoiceRepository, LoginService, UserCommand};
use backend::domain::{
    AuthOutcome, CachedView, CredentialFailure, FormFields, InvoiceStatus, MutationOutcome,
};
use rstest::{fixture, rstest};
use support::Harness;

#[fixture]
fn harness() -> Harness {
    Harness::new(CascadePolicy::BestEffort)
}

fn new_user(email: &str) -> FormFields {
    FormFields::from_pairs([
        ("name", "User"),
        ("email", email),
        ("password", "secret1"),
    ])
}

#[rstest]
#[tokio::test]
async fn registered_user_can_sign_in(harness: Harness) {
    let outcome = harness
        .user_service
        .create_user(&new_user("user@nextmail.com"))
        .await
        .expect("create succeeds");
    assert!(outcome.is_success());
    assert_eq!(harness.users.len(), 1);

    let accepted = harness
        .login
        .authenticate("user@nextmail.com", "secret1")
        .await
        .expect("no fatal fault");
    let AuthOutcome::Authenticated(user_id) = accepted else {
        panic!("expected sign-in to succeed, got {accepted:?}");
    };
    let stored = harness.users.stored_hash(&user_id).expect("row stored");
    assert!(!stored.contains("secret1"));

    let refused = harness
        .login
        .authenticate("user@nextmail.com", "secret2")
        .await
        .expect("no fatal fault");
    assert_eq!(
        refused,
        AuthOutcome::Rejected(CredentialFailure::InvalidCredentials)
    );
}

#[rstest]
#[tokio::test]
async fn unknown_email_is_invalid_credentials(harness: Harness) {
    let outcome = harness
        .login
        .authenticate("nobody@nextmail.com", "secret1")
        .await
        .expect("no fatal fault");

    assert_eq!(
        outcome,
        AuthOutcome::Rejected(CredentialFailure::InvalidCredentials)
    );
}

#[rstest]
#[tokio::test]
async fn second_registration_with_same_email_is_refused(harness: Harness) {
    harness
        .user_service
        .create_user(&new_user("user@nextmail.com"))
        .await
        .expect("first create succeeds");

    let outcome = harness
        .user_service
        .create_user(&new_user("user@nextmail.com"))
        .await
        .expect("duplicate email is recoverable");

    let MutationOutcome::Failure(state) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(state.errors().messages("email"), ["Email is already registered."]);
    assert_eq!(harness.users.len(), 1);
}

#[rstest]
#[tokio::test]
async fn invalid_invoice_reports_each_field(harness: Harness) {
    let fields = FormFields::from_pairs([("customerId", ""), ("amount", "0"), ("status", "")]);

    let outcome = harness
        .invoice_service
        .create_invoice(&fields)
        .await
        .expect("validation failures are recoverable");

    let MutationOutcome::Failure(state) = outcome else {
        panic!("expected failure");
    };
    assert_eq!(
        state.errors().fields().collect::<Vec<_>>(),
        ["amount", "customerId", "status"]
    );
    assert_eq!(
        state.summary(),
        Some("Missing Fields. Failed to Create Invoice.")
    );
    assert!(harness.invoices.is_empty());
    assert!(harness.views.stale_views().is_empty());
}

#[rstest]
#[tokio::test]
async fn valid_invoice_is_stored_in_cents(harness: Harness) {
    let customer = harness.seed_customer("https://utfs.io/f/img123").await;
    let fields = FormFields::from_pairs([
        ("customerId", customer.to_string().as_str()),
        ("amount", "156.78"),
        ("status", "paid"),
    ]);

    let outcome = harness
        .invoice_service
        .create_invoice(&fields)
        .await
        .expect("create succeeds");

    let MutationOutcome::Success(Some(navigation)) = outcome else {
        panic!("expected redirect");
    };
    assert_eq!(navigation.path(), "/dashboard/invoices");
    assert_eq!(harness.invoices.len(), 1);
    assert_eq!(harness.views.stale_views(), [CachedView::InvoiceList]);
    let ids = harness
        .invoices
        .list_ids_by_customer(&customer)
        .await
        .expect("list succeeds");
    let stored = harness.invoices.get(&ids[0]).expect("invoice stored");
    assert_eq!(stored.amount.cents(), 15_678);
    assert_eq!(stored.status, InvoiceStatus::Paid);
}

#[rstest]
#[tokio::test]
async fn update_moves_invoice_to_paid(harness: Harness) {
    let customer = harness.seed_customer("/customers/profile-default.png").await;
    let id = harness.seed_invoice(customer, 100).await;
    let fields = FormFields::from_pairs([
        ("customerId", customer.to_string().as_str()),
        ("amount", "1.005"),
        ("status", "paid"),
    ]);

    let outcome = harness
        .invoice_service
        .update_invoice(&id, &fields)
        .await
        .expect("update succeeds");

    assert!(outcome.is_success());
    let invoice = harness.invoices.get(&id).expect("still stored");
    assert_eq!(invoice.status, InvoiceStatus::Paid);
    assert_eq!(invoice.amount.cents(), 101);
}
