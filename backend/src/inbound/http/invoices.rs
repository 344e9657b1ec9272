//! Invoice mutation handlers.
//!
//! ```text
//! POST   /api/v1/invoices        customerId=..&amount=156.78&status=pending
//! PUT    /api/v1/invoices/{id}
//! DELETE /api/v1/invoices/{id}
//! ```

use actix_web::{HttpResponse, delete, post, put, web};

use crate::domain::{FormFields, InvoiceId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::form::{outcome_response, parse_path_id};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Create an invoice dated today.
#[utoipa::path(
    post,
    path = "/api/v1/invoices",
    request_body(
        content = crate::inbound::http::schemas::InvoiceFormSchema,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Created; redirect to the invoice list"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 422, description = "Validation or write failure", body = crate::domain::FormState),
        (status = 500, description = "Internal server error", body = crate::domain::Error)
    ),
    tags = ["invoices"],
    operation_id = "createInvoice"
)]
#[post("/invoices")]
pub async fn create_invoice(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<FormFields>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let outcome = state.invoices.create_invoice(&form).await?;
    Ok(outcome_response(outcome))
}

/// Overwrite customer, amount and status of an invoice.
#[utoipa::path(
    put,
    path = "/api/v1/invoices/{id}",
    params(("id" = String, Path, description = "Invoice identifier")),
    request_body(
        content = crate::inbound::http::schemas::InvoiceFormSchema,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Updated; redirect to the invoice list"),
        (status = 400, description = "Malformed identifier", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 422, description = "Validation or write failure", body = crate::domain::FormState)
    ),
    tags = ["invoices"],
    operation_id = "updateInvoice"
)]
#[put("/invoices/{id}")]
pub async fn update_invoice(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Form<FormFields>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let id = parse_path_id::<InvoiceId>(&path)?;
    let outcome = state.invoices.update_invoice(&id, &form).await?;
    Ok(outcome_response(outcome))
}

/// Delete an invoice. Deleting a missing invoice succeeds.
#[utoipa::path(
    delete,
    path = "/api/v1/invoices/{id}",
    params(("id" = String, Path, description = "Invoice identifier")),
    responses(
        (status = 204, description = "Deleted or already absent"),
        (status = 400, description = "Malformed identifier", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 503, description = "Storage unavailable", body = crate::domain::Error)
    ),
    tags = ["invoices"],
    operation_id = "deleteInvoice"
)]
#[delete("/invoices/{id}")]
pub async fn delete_invoice(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let id = parse_path_id::<InvoiceId>(&path)?;
    let outcome = state.invoices.delete_invoice(&id).await?;
    Ok(outcome_response(outcome))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Error, FieldErrors, FormState, MutationOutcome, Navigation};
    use crate::inbound::http::test_utils::{MockPorts, sign_in, test_app};
    use actix_web::http::{StatusCode, header};
    use actix_web::test;
    use rstest::rstest;

    const INVOICE: &str = "3958dc9e-712f-4377-85e9-fec4b6a6442a";

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.service(create_invoice)
            .service(update_invoice)
            .service(delete_invoice);
    }

    #[rstest]
    #[actix_web::test]
    async fn create_redirects_to_invoice_list() {
        let mut ports = MockPorts::default();
        ports
            .invoices
            .expect_create_invoice()
            .withf(|fields| fields.text("amount") == "156.78" && fields.text("status") == "paid")
            .times(1)
            .return_once(|_| Ok(MutationOutcome::redirect(Navigation::to("/dashboard/invoices"))));
        let app = test::init_service(test_app(ports.into_state(), routes)).await;
        let cookie = sign_in(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/invoices")
                .cookie(cookie)
                .set_form([
                    ("customerId", "d6e15727-9fe1-4961-8c5b-ea44a9bd81aa"),
                    ("amount", "156.78"),
                    ("status", "paid"),
                ])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers().get(header::LOCATION).map(|v| v.as_bytes()),
            Some(&b"/dashboard/invoices"[..])
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn validation_failure_is_unprocessable() {
        let mut ports = MockPorts::default();
        ports.invoices.expect_create_invoice().return_once(|_| {
            let mut errors = FieldErrors::default();
            errors.push("customerId", "Please select a customer.");
            Ok(MutationOutcome::Failure(FormState::invalid(
                errors,
                "Missing Fields. Failed to Create Invoice.",
            )))
        });
        let app = test::init_service(test_app(ports.into_state(), routes)).await;
        let cookie = sign_in(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/invoices")
                .cookie(cookie)
                .set_form([("customerId", ""), ("amount", "0"), ("status", "pending")])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["errors"]["customerId"][0], "Please select a customer.");
    }

    #[rstest]
    #[actix_web::test]
    async fn signed_out_callers_are_rejected() {
        let mut ports = MockPorts::default();
        ports.invoices.expect_delete_invoice().times(0);
        let app = test::init_service(test_app(ports.into_state(), routes)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/invoices/{INVOICE}"))
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_is_no_content() {
        let mut ports = MockPorts::default();
        ports
            .invoices
            .expect_delete_invoice()
            .withf(|id| id.to_string() == INVOICE)
            .times(1)
            .return_once(|_| Ok(MutationOutcome::done()));
        let app = test::init_service(test_app(ports.into_state(), routes)).await;
        let cookie = sign_in(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/invoices/{INVOICE}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::NO_CONTENT);
    }

    #[rstest]
    #[actix_web::test]
    async fn fatal_delete_fault_is_service_unavailable() {
        let mut ports = MockPorts::default();
        ports
            .invoices
            .expect_delete_invoice()
            .return_once(|_| Err(Error::service_unavailable("invoice storage unavailable")));
        let app = test::init_service(test_app(ports.into_state(), routes)).await;
        let cookie = sign_in(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/v1/invoices/{INVOICE}"))
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_id_is_bad_request() {
        let mut ports = MockPorts::default();
        ports.invoices.expect_update_invoice().times(0);
        let app = test::init_service(test_app(ports.into_state(), routes)).await;
        let cookie = sign_in(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::put()
                .uri("/api/v1/invoices/not-a-uuid")
                .cookie(cookie)
                .set_form([("amount", "1")])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }
}
