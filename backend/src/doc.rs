//! OpenAPI documentation configuration.
//!
//! Registers every HTTP handler, the form schemas that describe the
//! form-encoded bodies and the session cookie security scheme. The document
//! backs Swagger UI in debug builds and `openapi-dump`.

use crate::domain::{Error, ErrorCode, FormState};
use crate::inbound::http::auth::{LoginForm, LoginRejection};
use crate::inbound::http::schemas::{
    CustomerFormSchema, InvoiceFormSchema, ProfileImageFormSchema, UserFormSchema,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Session cookie issued by POST /api/v1/login.",
            ))),
        );
    }
}

/// OpenAPI document for the admin API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Invoice admin API",
        description = "Session-authenticated mutations for invoices, customers and administrators."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::invoices::create_invoice,
        crate::inbound::http::invoices::update_invoice,
        crate::inbound::http::invoices::delete_invoice,
        crate::inbound::http::customers::create_customer,
        crate::inbound::http::customers::update_customer,
        crate::inbound::http::customers::update_customer_profile,
        crate::inbound::http::customers::delete_customer,
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::update_user,
        crate::inbound::http::users::delete_user,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        Error,
        ErrorCode,
        FormState,
        LoginForm,
        LoginRejection,
        InvoiceFormSchema,
        CustomerFormSchema,
        ProfileImageFormSchema,
        UserFormSchema,
    )),
    tags(
        (name = "auth", description = "Sign-in and sign-out"),
        (name = "invoices", description = "Invoice mutations"),
        (name = "customers", description = "Customer mutations and cascading delete"),
        (name = "users", description = "Administrator accounts"),
        (name = "health", description = "Liveness and readiness checks")
    )
)]
pub struct ApiDoc;
