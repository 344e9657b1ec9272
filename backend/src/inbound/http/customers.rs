//! Customer mutation handlers.
//!
//! ```text
//! POST   /api/v1/customers             name=..&email=..&image_url=..
//! PUT    /api/v1/customers/{id}
//! PUT    /api/v1/customers/{id}/image  image_url=..
//! DELETE /api/v1/customers/{id}
//! ```

use actix_web::{HttpResponse, delete, post, put, web};

use crate::domain::{CustomerId, FormFields};
use crate::inbound::http::ApiResult;
use crate::inbound::http::form::{outcome_response, parse_path_id};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

#[utoipa::path(
    post,
    path = "/api/v1/customers",
    request_body(
        content = crate::inbound::http::schemas::CustomerFormSchema,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Created; redirect to the customer list"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 422, description = "Validation or write failure", body = crate::domain::FormState)
    ),
    tags = ["customers"],
    operation_id = "createCustomer"
)]
#[post("/customers")]
pub async fn create_customer(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<FormFields>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let outcome = state.customers.create_customer(&form).await?;
    Ok(outcome_response(outcome))
}

#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}",
    params(("id" = String, Path, description = "Customer identifier")),
    request_body(
        content = crate::inbound::http::schemas::CustomerFormSchema,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Updated; redirect to the customer list"),
        (status = 400, description = "Malformed identifier", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 422, description = "Validation or write failure", body = crate::domain::FormState)
    ),
    tags = ["customers"],
    operation_id = "updateCustomer"
)]
#[put("/customers/{id}")]
pub async fn update_customer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Form<FormFields>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let id = parse_path_id::<CustomerId>(&path)?;
    let outcome = state.customers.update_customer(&id, &form).await?;
    Ok(outcome_response(outcome))
}

/// Replace the profile image; the previous upload is removed from storage.
#[utoipa::path(
    put,
    path = "/api/v1/customers/{id}/image",
    params(("id" = String, Path, description = "Customer identifier")),
    request_body(
        content = crate::inbound::http::schemas::ProfileImageFormSchema,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 204, description = "Image replaced"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 422, description = "Validation or write failure", body = crate::domain::FormState),
        (status = 503, description = "Previous image could not be removed", body = crate::domain::Error)
    ),
    tags = ["customers"],
    operation_id = "updateCustomerProfile"
)]
#[put("/customers/{id}/image")]
pub async fn update_customer_profile(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Form<FormFields>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let id = parse_path_id::<CustomerId>(&path)?;
    let outcome = state.customers.update_customer_profile(&id, &form).await?;
    Ok(outcome_response(outcome))
}

/// Delete a customer with its invoices and uploaded image.
#[utoipa::path(
    delete,
    path = "/api/v1/customers/{id}",
    params(("id" = String, Path, description = "Customer identifier")),
    responses(
        (status = 204, description = "Customer removed"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 409, description = "Strict cascade kept the customer after a failed step", body = crate::domain::Error),
        (status = 503, description = "Storage unavailable", body = crate::domain::Error)
    ),
    tags = ["customers"],
    operation_id = "deleteCustomer"
)]
#[delete("/customers/{id}")]
pub async fn delete_customer(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let id = parse_path_id::<CustomerId>(&path)?;
    let outcome = state.customers.delete_customer(&id).await?;
    Ok(outcome_response(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Error, FormState, MutationOutcome, Navigation};
    use crate::inbound::http::test_utils::{MockPorts, sign_in, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::json;

    const CUSTOMER: &str = "d6e15727-9fe1-4961-8c5b-ea44a9bd81aa";

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.service(create_customer)
            .service(update_customer)
            .service(update_customer_profile)
            .service(delete_customer);
    }

    #[rstest]
    #[actix_web::test]
    async fn create_forwards_fields() {
        let mut ports = MockPorts::default();
        ports
            .customers
            .expect_create_customer()
            .withf(|fields| {
                fields.text("name") == "Delba de Oliveira"
                    && fields.text("image_url") == "https://utfs.io/f/img123"
            })
            .times(1)
            .return_once(|_| Ok(MutationOutcome::redirect(Navigation::to("/dashboard/customers"))));
        let app = test::init_service(test_app(ports.into_state(), routes)).await;
        let cookie = sign_in(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/customers")
                .cookie(cookie)
                .set_form([
                    ("name", "Delba de Oliveira"),
                    ("email", "delba@oliveira.com"),
                    ("image_url", "https://utfs.io/f/img123"),
                ])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
    }

    #[rstest]
    #[actix_web::test]
    async fn profile_update_failure_is_unprocessable() {
        let mut ports = MockPorts::default();
        ports
            .customers
            .expect_update_customer_profile()
            .withf(|id, _| id.to_string() == CUSTOMER)
            .return_once(|_, _| {
                Ok(MutationOutcome::Failure(FormState::message(
                    "Database Error: Failed to Update Customer profile.",
                )))
            });
        let app = test::init_service(test_app(ports.into_state(), routes)).await;
        let cookie = sign_in(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&format!("/api/v1/customers/{CUSTOMER}/image"))
                .cookie(cookie)
                .set_form([("image_url", "https://utfs.io/f/img456")])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Database Error: Failed to Update Customer profile.");
    }

    #[rstest]
    #[actix_web::test]
    async fn strict_cascade_abort_is_conflict() {
        let mut ports = MockPorts::default();
        ports.customers.expect_delete_customer().return_once(|_| {
            Err(Error::conflict("customer kept")
                .with_details(json!({"code": "cascade_aborted"})))
        });
        let app = test::init_service(test_app(ports.into_state(), routes)).await;
        let cookie = sign_in(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/customers/{CUSTOMER}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::CONFLICT);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["details"]["code"], "cascade_aborted");
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_is_no_content() {
        let mut ports = MockPorts::default();
        ports
            .customers
            .expect_delete_customer()
            .times(1)
            .return_once(|_| Ok(MutationOutcome::done()));
        let app = test::init_service(test_app(ports.into_state(), routes)).await;
        let cookie = sign_in(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/customers/{CUSTOMER}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }
}
