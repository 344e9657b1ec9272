//! User data model and input validation.
//!
//! Plaintext passwords only ever live inside [`UserDraft`] and are wiped on
//! drop. Storage sees [`PasswordHash`] values.

use std::fmt;

use serde::Serialize;
use utoipa::ToSchema;
use zeroize::Zeroizing;

use super::form::{FormFields, ValidationResult};
use super::ids::UserId;
use super::schema::{FieldConstraint, FieldRule, Schema};

pub const NAME_FIELD: &str = "name";
pub const EMAIL_FIELD: &str = "email";
pub const PASSWORD_FIELD: &str = "password";

/// Minimum accepted password length, in characters.
pub const PASSWORD_MIN: usize = 6;

/// Message attached to `email` when the address is already taken.
pub const EMAIL_TAKEN_MESSAGE: &str = "Email is already registered.";

/// Synchronous constraints applied to user forms.
pub const USER_SCHEMA: Schema = Schema::new(&[
    FieldConstraint::new(NAME_FIELD, FieldRule::Required, "Please insert a user name."),
    FieldConstraint::new(
        EMAIL_FIELD,
        FieldRule::Email,
        "Please insert a valid email address.",
    ),
    FieldConstraint::new(
        PASSWORD_FIELD,
        FieldRule::MinLength(PASSWORD_MIN),
        "Password must be at least 6 characters.",
    ),
]);

/// Encoded one-way password digest.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap an already encoded digest; nothing is hashed here.
    pub fn new(encoded: impl Into<String>) -> Self {
        Self(encoded.into())
    }

    /// Encoded form as stored in the `password` column.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

/// Validated user fields. Holds the plaintext password until it is hashed.
#[derive(Clone, PartialEq, Eq)]
pub struct UserDraft {
    name: String,
    email: String,
    password: Zeroizing<String>,
}

impl UserDraft {
    /// Validate the synchronous user rules.
    ///
    /// Email uniqueness needs storage and is layered on by the user service.
    pub fn validate(fields: &FormFields) -> ValidationResult<Self> {
        let errors = USER_SCHEMA.check(fields);
        if !errors.is_empty() {
            return ValidationResult::Invalid(errors);
        }
        ValidationResult::Valid(Self {
            name: fields.text(NAME_FIELD).trim().to_owned(),
            email: fields.text(EMAIL_FIELD).trim().to_owned(),
            password: Zeroizing::new(fields.text(PASSWORD_FIELD).to_owned()),
        })
    }

    pub fn name(&self) -> &str {
        self.name.as_str()
    }

    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    pub fn password(&self) -> &str {
        self.password.as_str()
    }

    /// Swap the plaintext for its digest.
    pub fn into_hashed(self, password_hash: PasswordHash) -> NewUser {
        NewUser {
            name: self.name,
            email: self.email,
            password_hash,
        }
    }
}

impl fmt::Debug for UserDraft {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserDraft")
            .field("name", &self.name)
            .field("email", &self.email)
            .finish_non_exhaustive()
    }
}

/// User row contents as written to storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: PasswordHash,
}

/// Credential material looked up for sign-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredCredentials {
    pub user_id: UserId,
    pub password_hash: PasswordHash,
}

/// Public view of a stored user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[schema(value_type = String, format = Uuid)]
    pub id: UserId,
    pub name: String,
    pub email: String,
}
