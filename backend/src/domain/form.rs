//! Raw form input and the error state returned to the caller.
//!
//! [`FormFields`] is the untrusted side of the pipeline: whatever the form
//! posted, keyed by field name. [`FormState`] is what travels back when a
//! mutation does not go through.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Untrusted field values submitted by a form.
///
/// Missing fields and blank strings are indistinguishable to rules: both read
/// as the empty string.
///
/// # Examples
/// ```
/// use backend::domain::FormFields;
///
/// let fields = FormFields::from_pairs([("name", "Ada"), ("email", "")]);
/// assert_eq!(fields.text("name"), "Ada");
/// assert_eq!(fields.text("email"), "");
/// assert_eq!(fields.text("missing"), "");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FormFields(BTreeMap<String, String>);

impl FormFields {
    /// Build a field set from name/value pairs. Later duplicates win.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(name, value)| (name.into(), value.into()))
                .collect(),
        )
    }

    /// Value of `name`, or the empty string when absent.
    pub fn text(&self, name: &str) -> &str {
        self.0.get(name).map(String::as_str).unwrap_or_default()
    }

    /// Insert or replace a field value.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.0.insert(name.into(), value.into());
    }
}

/// Field name to ordered list of messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

impl FieldErrors {
    /// Append `message` to the messages recorded for `field`.
    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.0.entry(field.into()).or_default().push(message.into());
    }

    /// Messages recorded for `field`, empty when the field passed.
    pub fn messages(&self, field: &str) -> &[String] {
        self.0.get(field).map(Vec::as_slice).unwrap_or_default()
    }

    /// True when `field` already carries at least one message.
    pub fn has(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    /// Names of the fields that failed, in sorted order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Error state returned to the form when a mutation does not complete.
///
/// Exactly one of two shapes in practice: validation failures populate
/// `errors` (and a form-level `message`), storage failures leave `errors`
/// empty and set `message`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FormState {
    #[schema(value_type = Object)]
    errors: FieldErrors,
    #[schema(example = "Missing Fields. Failed to Create Invoice.")]
    message: Option<String>,
}

impl FormState {
    /// Validation failure with a form-level summary.
    pub fn invalid(errors: FieldErrors, message: impl Into<String>) -> Self {
        Self {
            errors,
            message: Some(message.into()),
        }
    }

    /// Failure with only a top-level message.
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            errors: FieldErrors::default(),
            message: Some(message.into()),
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn summary(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

/// Result of validating a field set: exactly one of parsed value or errors.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult<T> {
    Valid(T),
    Invalid(FieldErrors),
}

impl<T> ValidationResult<T> {
    /// Convert into a `Result`, attaching `message` to the failure state.
    pub fn into_form_result(self, message: &str) -> Result<T, FormState> {
        match self {
            Self::Valid(value) => Ok(value),
            Self::Invalid(errors) => Err(FormState::invalid(errors, message)),
        }
    }
}
