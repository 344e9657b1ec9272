//! Authentication primitives: sign-in credentials and failure kinds.
//!
//! Credentials are shape-checked before any lookup. A malformed submission is
//! indistinguishable from a wrong password to the caller.

use std::fmt;

use zeroize::Zeroizing;

use super::ids::UserId;
use super::schema::is_well_formed_email;
use super::user::PASSWORD_MIN;

/// Domain error returned when sign-in values are malformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was blank or not an address.
    InvalidEmail,
    /// Password was shorter than the minimum length.
    PasswordTooShort { min: usize },
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidEmail => write!(f, "email must be a valid address"),
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated sign-in credentials.
///
/// ## Invariants
/// - `email` is trimmed and well formed.
/// - `password` keeps caller-provided whitespace and is wiped on drop.
///
/// # Examples
/// ```
/// use backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" user@nextmail.com ", "123456").unwrap();
/// assert_eq!(creds.email(), "user@nextmail.com");
/// assert_eq!(creds.password(), "123456");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if !is_well_formed_email(normalized) {
            return Err(LoginValidationError::InvalidEmail);
        }
        if password.chars().count() < PASSWORD_MIN {
            return Err(LoginValidationError::PasswordTooShort { min: PASSWORD_MIN });
        }

        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email used to look up stored credentials.
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Why a sign-in attempt did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialFailure {
    /// Unknown identity, wrong secret, or malformed input.
    InvalidCredentials,
    /// The provider failed in a way the caller cannot act on.
    Unknown,
}

impl CredentialFailure {
    /// Message shown to the person signing in.
    pub const fn message(self) -> &'static str {
        match self {
            Self::InvalidCredentials => "Invalid credentials.",
            Self::Unknown => "Something went wrong.",
        }
    }
}

/// Result of a sign-in attempt that did not hit a fatal fault.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthOutcome {
    Authenticated(UserId),
    Rejected(CredentialFailure),
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "secret1", LoginValidationError::InvalidEmail)]
    #[case("not-an-email", "secret1", LoginValidationError::InvalidEmail)]
    #[case("user@nextmail.com", "12345", LoginValidationError::PasswordTooShort { min: 6 })]
    fn invalid_credentials(
        #[case] email: &str,
        #[case] password: &str,
        #[case] expected: LoginValidationError,
    ) {
        let err = LoginCredentials::try_from_parts(email, password)
            .expect_err("invalid inputs must fail");
        assert_eq!(err, expected);
    }

    #[rstest]
    #[case(CredentialFailure::InvalidCredentials, "Invalid credentials.")]
    #[case(CredentialFailure::Unknown, "Something went wrong.")]
    fn failure_messages(#[case] failure: CredentialFailure, #[case] expected: &str) {
        assert_eq!(failure.message(), expected);
    }
}
