//! Customer data model, profile images and input validation.

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::form::{FormFields, ValidationResult};
use super::ids::CustomerId;
use super::schema::{FieldConstraint, FieldRule, Schema};

pub const NAME_FIELD: &str = "name";
pub const EMAIL_FIELD: &str = "email";
pub const IMAGE_URL_FIELD: &str = "image_url";

/// Placeholder image assigned to customers without an uploaded profile.
pub const DEFAULT_PROFILE_IMAGE: &str = "/customers/profile-default.png";

const IMAGE_URL_MESSAGE: &str = "Please insert a valid image URL.";

/// Constraints applied to customer forms.
pub const CUSTOMER_SCHEMA: Schema = Schema::new(&[
    FieldConstraint::new(NAME_FIELD, FieldRule::Required, "Please insert a customer name."),
    FieldConstraint::new(
        EMAIL_FIELD,
        FieldRule::Email,
        "Please insert a valid email address.",
    ),
    FieldConstraint::new(IMAGE_URL_FIELD, FieldRule::Required, IMAGE_URL_MESSAGE),
]);

/// Constraints applied when only the profile image is replaced.
pub const PROFILE_IMAGE_SCHEMA: Schema = Schema::new(&[FieldConstraint::new(
    IMAGE_URL_FIELD,
    FieldRule::Required,
    IMAGE_URL_MESSAGE,
)]);

/// Key of a file held by the external blob store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BlobKey(String);

impl BlobKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for BlobKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reference to a customer's profile image.
///
/// Uploaded images are URLs whose final path segment is the blob key.
///
/// # Examples
/// ```
/// use backend::domain::ImageReference;
///
/// let uploaded = ImageReference::new("https://host/f/img123");
/// assert_eq!(uploaded.blob_key().map(|key| key.to_string()), Some("img123".to_owned()));
/// assert!(ImageReference::default_profile().blob_key().is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImageReference(String);

impl ImageReference {
    pub fn new(url: impl Into<String>) -> Self {
        Self(url.into())
    }

    pub fn default_profile() -> Self {
        Self(DEFAULT_PROFILE_IMAGE.to_owned())
    }

    pub fn is_default(&self) -> bool {
        self.0 == DEFAULT_PROFILE_IMAGE
    }

    /// Blob-store key for this image; `None` for the placeholder or when the
    /// reference ends in a slash.
    pub fn blob_key(&self) -> Option<BlobKey> {
        if self.is_default() {
            return None;
        }
        let key = self.0.rsplit('/').next().unwrap_or_default();
        (!key.is_empty()).then(|| BlobKey(key.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Validated customer fields, ready for a write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomerDraft {
    pub name: String,
    pub email: String,
    pub image: ImageReference,
}

impl CustomerDraft {
    /// Validate raw form fields into a draft.
    pub fn validate(fields: &FormFields) -> ValidationResult<Self> {
        let errors = CUSTOMER_SCHEMA.check(fields);
        if !errors.is_empty() {
            return ValidationResult::Invalid(errors);
        }
        ValidationResult::Valid(Self {
            name: fields.text(NAME_FIELD).trim().to_owned(),
            email: fields.text(EMAIL_FIELD).trim().to_owned(),
            image: ImageReference::new(fields.text(IMAGE_URL_FIELD).trim()),
        })
    }
}

/// Validate a replacement profile image.
pub fn validate_profile_image(fields: &FormFields) -> ValidationResult<ImageReference> {
    let errors = PROFILE_IMAGE_SCHEMA.check(fields);
    if errors.is_empty() {
        ValidationResult::Valid(ImageReference::new(fields.text(IMAGE_URL_FIELD).trim()))
    } else {
        ValidationResult::Invalid(errors)
    }
}

/// Stored customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    #[schema(value_type = String, format = Uuid)]
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    #[schema(value_type = String, example = "/customers/profile-default.png")]
    pub image_url: ImageReference,
}
