//! User account mutations.
//!
//! User forms add one asynchronous rule to the declarative schema: the email
//! must not belong to another account. The lookup runs at most once per
//! submission and only when the email is otherwise well formed.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, info};

use crate::domain::ports::{PasswordHasher, UserCommand, UserRepository};
use crate::domain::storage_faults::map_user_error;
use crate::domain::user::{EMAIL_FIELD, EMAIL_TAKEN_MESSAGE};
use crate::domain::{
    CachedView, DeleteOutcome, Error, FieldErrors, FormFields, FormState, MutationOutcome,
    UniquenessChecker, UserDraft, UserId, ValidationResult, ViewInvalidator,
};

const CREATE_INVALID: &str = "Missing Fields. Failed to Create User.";
const UPDATE_INVALID: &str = "Missing Fields. Failed to Update User.";
const CREATE_FAILED: &str = "Database Error: Failed to Create User.";
const UPDATE_FAILED: &str = "Database Error: Failed to Update User.";

/// User service implementing [`UserCommand`].
#[derive(Clone)]
pub struct UserService {
    users: Arc<dyn UserRepository>,
    hasher: Arc<dyn PasswordHasher>,
    uniqueness: UniquenessChecker,
    views: ViewInvalidator,
}

impl UserService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        hasher: Arc<dyn PasswordHasher>,
        views: ViewInvalidator,
    ) -> Self {
        Self {
            uniqueness: UniquenessChecker::new(Arc::clone(&users)),
            users,
            hasher,
            views,
        }
    }

    async fn validate(
        &self,
        fields: &FormFields,
        excluding: Option<UserId>,
    ) -> Result<ValidationResult<UserDraft>, Error> {
        let result = UserDraft::validate(fields);
        let email_well_formed = match &result {
            ValidationResult::Valid(_) => true,
            ValidationResult::Invalid(errors) => !errors.has(EMAIL_FIELD),
        };
        if !email_well_formed {
            return Ok(result);
        }

        let email = fields.text(EMAIL_FIELD).trim();
        if !self.uniqueness.is_registered(email, excluding).await? {
            return Ok(result);
        }
        debug!("email already registered");
        let mut errors = match result {
            ValidationResult::Valid(_) => FieldErrors::default(),
            ValidationResult::Invalid(errors) => errors,
        };
        errors.push(EMAIL_FIELD, EMAIL_TAKEN_MESSAGE);
        Ok(ValidationResult::Invalid(errors))
    }
}

#[async_trait]
impl UserCommand for UserService {
    async fn create_user(&self, fields: &FormFields) -> Result<MutationOutcome, Error> {
        let draft = match self.validate(fields, None).await?.into_form_result(CREATE_INVALID) {
            Ok(draft) => draft,
            Err(state) => return Ok(MutationOutcome::Failure(state)),
        };
        let hash = self.hasher.hash(draft.password());
        let user = draft.into_hashed(hash);

        match self.users.create(&user).await {
            Ok(id) => {
                info!(user_id = %id, "user created");
                Ok(MutationOutcome::redirect(
                    self.views.invalidate_and_return(CachedView::UserList),
                ))
            }
            Err(err) => {
                error!(error = %err, "user insert failed");
                Ok(MutationOutcome::Failure(FormState::message(CREATE_FAILED)))
            }
        }
    }

    async fn update_user(&self, id: &UserId, fields: &FormFields) -> Result<MutationOutcome, Error> {
        let draft = match self
            .validate(fields, Some(*id))
            .await?
            .into_form_result(UPDATE_INVALID)
        {
            Ok(draft) => draft,
            Err(state) => return Ok(MutationOutcome::Failure(state)),
        };
        let hash = self.hasher.hash(draft.password());
        let user = draft.into_hashed(hash);

        match self.users.update(id, &user).await {
            Ok(()) => {
                info!(user_id = %id, "user updated");
                Ok(MutationOutcome::redirect(
                    self.views.invalidate_and_return(CachedView::UserList),
                ))
            }
            Err(err) => {
                error!(user_id = %id, error = %err, "user update failed");
                Ok(MutationOutcome::Failure(FormState::message(UPDATE_FAILED)))
            }
        }
    }

    async fn delete_user(&self, id: &UserId) -> Result<MutationOutcome, Error> {
        match self.users.delete(id).await.map_err(map_user_error)? {
            DeleteOutcome::Deleted => info!(user_id = %id, "user deleted"),
            DeleteOutcome::NotFound => debug!(user_id = %id, "user already absent"),
        }
        self.views.invalidate(CachedView::UserList);
        Ok(MutationOutcome::done())
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
