//! Email uniqueness lookups used while validating user forms.

use std::sync::Arc;

use crate::domain::ports::UserRepository;
use crate::domain::storage_faults::map_user_error;
use crate::domain::{Error, UserId};

/// Asks the user store whether an email is already taken.
#[derive(Clone)]
pub struct UniquenessChecker {
    users: Arc<dyn UserRepository>,
}

impl UniquenessChecker {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// True when another account already uses `email`.
    ///
    /// `excluding` leaves the caller's own row out of the count on update.
    /// Lookup failures propagate; they are never read as "not registered".
    pub async fn is_registered(&self, email: &str, excluding: Option<UserId>) -> Result<bool, Error> {
        let count = self
            .users
            .count_by_email(email, excluding)
            .await
            .map_err(map_user_error)?;
        Ok(count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{MockUserRepository, UserPersistenceError};
    use mockall::predicate::eq;

    #[tokio::test]
    async fn counts_other_rows_only() {
        let own = UserId::random();
        let mut repo = MockUserRepository::new();
        repo.expect_count_by_email()
            .with(eq("ada@example.com"), eq(Some(own)))
            .times(1)
            .return_once(|_, _| Ok(0));

        let checker = UniquenessChecker::new(Arc::new(repo));

        assert!(!checker
            .is_registered("ada@example.com", Some(own))
            .await
            .expect("lookup succeeds"));
    }

    #[tokio::test]
    async fn lookup_failure_is_not_treated_as_free() {
        let mut repo = MockUserRepository::new();
        repo.expect_count_by_email()
            .times(1)
            .return_once(|_, _| Err(UserPersistenceError::connection("refused")));

        let error = UniquenessChecker::new(Arc::new(repo))
            .is_registered("ada@example.com", None)
            .await
            .expect_err("lookup failure propagates");

        assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
    }
}
