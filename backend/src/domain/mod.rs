//! Domain primitives, ports and services.
//!
//! Purpose: define the validated-mutation pipeline for customers, invoices
//! and users independently of HTTP and storage. Adapters reach the domain
//! only through the traits in [`ports`].
//!
//! Public surface:
//! - Error / ErrorCode: fatal error payload and its stable code.
//! - FormFields / FormState / ValidationResult: untrusted input and the error
//!   state returned to forms.
//! - MutationOutcome: recoverable result of every mutation.
//! - InvoiceService / CustomerService / UserService / CredentialGate: driving
//!   port implementations.
//! - cascade: the cascading customer delete and its journal types.

pub mod auth;
pub mod cascade;
pub mod credential_gate;
pub mod customer;
pub mod customer_service;
pub mod error;
pub mod form;
pub mod ids;
pub mod invoice;
pub mod invoice_service;
pub mod outcome;
pub mod ports;
pub mod schema;
pub(crate) mod storage_faults;
pub mod trace_id;
pub mod uniqueness;
pub mod user;
pub mod user_service;
pub mod view_invalidator;

pub use self::auth::{AuthOutcome, CredentialFailure, LoginCredentials, LoginValidationError};
pub use self::credential_gate::CredentialGate;
pub use self::customer::{
    BlobKey, Customer, CustomerDraft, DEFAULT_PROFILE_IMAGE, ImageReference,
    validate_profile_image,
};
pub use self::customer_service::CustomerService;
pub use self::error::{Error, ErrorCode, ErrorValidationError};
pub use self::form::{FieldErrors, FormFields, FormState, ValidationResult};
pub use self::ids::{CustomerId, IdParseError, InvoiceId, UserId};
pub use self::invoice::{AmountInCents, Invoice, InvoiceDraft, InvoiceStatus};
pub use self::invoice_service::InvoiceService;
pub use self::outcome::{DeleteOutcome, MutationOutcome, Navigation};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::uniqueness::UniquenessChecker;
pub use self::user::{NewUser, PasswordHash, StoredCredentials, User, UserDraft};
pub use self::user_service::UserService;
pub use self::view_invalidator::{CachedView, ViewInvalidator};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use actix_web::HttpResponse;
/// use backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<HttpResponse> {
///     Err(Error::forbidden("nope"))
/// }
/// ```
pub type ApiResult<T> = Result<T, Error>;
