//! Invoice data model and input validation.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::form::{FieldErrors, FormFields, ValidationResult};
use super::ids::{CustomerId, InvoiceId};
use super::schema::{FieldConstraint, FieldRule, Schema, coerce_cents};

pub const CUSTOMER_ID_FIELD: &str = "customerId";
pub const AMOUNT_FIELD: &str = "amount";
pub const STATUS_FIELD: &str = "status";

const STATUS_LITERALS: &[&str] = &["pending", "paid"];

/// Constraints applied to invoice forms.
pub const INVOICE_SCHEMA: Schema = Schema::new(&[
    FieldConstraint::new(
        CUSTOMER_ID_FIELD,
        FieldRule::Reference,
        "Please select a customer.",
    ),
    FieldConstraint::new(
        AMOUNT_FIELD,
        FieldRule::PositiveAmount,
        "Please enter an amount greater than $0.",
    ),
    FieldConstraint::new(
        STATUS_FIELD,
        FieldRule::OneOf(STATUS_LITERALS),
        "Please select an invoice status.",
    ),
]);

/// Payment state of an invoice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum InvoiceStatus {
    Pending,
    Paid,
}

impl InvoiceStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a status literal is not recognised.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown invoice status: {0}")]
pub struct InvoiceStatusParseError(String);

impl FromStr for InvoiceStatus {
    type Err = InvoiceStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            other => Err(InvoiceStatusParseError(other.to_owned())),
        }
    }
}

/// Invoice amount in whole cents.
///
/// # Examples
/// ```
/// use backend::domain::AmountInCents;
///
/// let amount = AmountInCents::new(1999).expect("positive amounts fit");
/// assert_eq!(amount.cents(), 1999);
/// assert!(AmountInCents::new(-1).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AmountInCents(i32);

impl AmountInCents {
    /// Wrap a stored cent value. Negative amounts are rejected.
    pub fn new(cents: i32) -> Option<Self> {
        (cents >= 0).then_some(Self(cents))
    }

    pub const fn cents(self) -> i32 {
        self.0
    }
}

/// Validated invoice fields, ready for a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceDraft {
    customer_id: CustomerId,
    amount: AmountInCents,
    status: InvoiceStatus,
}

impl InvoiceDraft {
    pub fn new(customer_id: CustomerId, amount: AmountInCents, status: InvoiceStatus) -> Self {
        Self {
            customer_id,
            amount,
            status,
        }
    }

    /// Validate raw form fields into a draft.
    ///
    /// # Examples
    /// ```
    /// use backend::domain::{FormFields, InvoiceDraft, ValidationResult};
    ///
    /// let fields = FormFields::from_pairs([
    ///     ("customerId", ""),
    ///     ("amount", "0"),
    ///     ("status", "pending"),
    /// ]);
    /// let ValidationResult::Invalid(errors) = InvoiceDraft::validate(&fields) else {
    ///     panic!("blank customer and zero amount are invalid");
    /// };
    /// assert_eq!(errors.fields().collect::<Vec<_>>(), ["amount", "customerId"]);
    /// ```
    pub fn validate(fields: &FormFields) -> ValidationResult<Self> {
        let errors = INVOICE_SCHEMA.check(fields);
        if !errors.is_empty() {
            return ValidationResult::Invalid(errors);
        }
        match Self::parse_checked(fields) {
            Ok(draft) => ValidationResult::Valid(draft),
            Err(errors) => ValidationResult::Invalid(errors),
        }
    }

    // Runs after the schema passes; residual failures stay field errors.
    fn parse_checked(fields: &FormFields) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::default();
        let customer_id = CustomerId::new(fields.text(CUSTOMER_ID_FIELD).trim())
            .map_err(|err| errors.push(CUSTOMER_ID_FIELD, err.to_string()))
            .ok();
        let amount = coerce_cents(fields.text(AMOUNT_FIELD))
            .ok()
            .and_then(|cents| i32::try_from(cents).ok())
            .and_then(AmountInCents::new);
        if amount.is_none() {
            errors.push(AMOUNT_FIELD, super::schema::AMOUNT_NOT_A_NUMBER);
        }
        let status = fields
            .text(STATUS_FIELD)
            .parse::<InvoiceStatus>()
            .map_err(|err| errors.push(STATUS_FIELD, err.to_string()))
            .ok();

        match (customer_id, amount, status) {
            (Some(customer_id), Some(amount), Some(status)) => {
                Ok(Self::new(customer_id, amount, status))
            }
            _ => Err(errors),
        }
    }

    pub fn customer_id(&self) -> CustomerId {
        self.customer_id
    }

    pub fn amount(&self) -> AmountInCents {
        self.amount
    }

    pub fn status(&self) -> InvoiceStatus {
        self.status
    }
}

/// Stored invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[schema(value_type = String, format = Uuid)]
    pub id: InvoiceId,
    #[schema(value_type = String, format = Uuid)]
    pub customer_id: CustomerId,
    #[schema(value_type = i32, example = 1999)]
    pub amount: AmountInCents,
    pub status: InvoiceStatus,
    pub date: NaiveDate,
}
