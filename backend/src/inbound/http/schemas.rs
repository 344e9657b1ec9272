//! OpenAPI schemas for form-encoded request bodies.
//!
//! Handlers read bodies as raw [`crate::domain::FormFields`] so missing or
//! malformed fields reach validation instead of failing extraction. These
//! types only describe the expected fields for the generated document.

use utoipa::ToSchema;

/// Invoice create/update form.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct InvoiceFormSchema {
    #[schema(rename = "customerId", format = Uuid)]
    customer_id: String,
    /// Decimal dollar amount; stored as whole cents.
    #[schema(example = "156.78")]
    amount: String,
    #[schema(example = "pending")]
    status: String,
}

/// Customer create/update form.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct CustomerFormSchema {
    #[schema(example = "Delba de Oliveira")]
    name: String,
    #[schema(example = "delba@oliveira.com")]
    email: String,
    #[schema(example = "https://utfs.io/f/img123")]
    image_url: String,
}

/// Profile image replacement form.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct ProfileImageFormSchema {
    #[schema(example = "https://utfs.io/f/img456")]
    image_url: String,
}

/// User create/update form.
#[derive(ToSchema)]
#[expect(dead_code, reason = "Used only for OpenAPI schema generation via utoipa")]
pub struct UserFormSchema {
    #[schema(example = "User")]
    name: String,
    #[schema(example = "user@nextmail.com")]
    email: String,
    /// At least six characters.
    password: String,
}
