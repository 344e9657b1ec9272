//! Administrator account handlers.
//!
//! ```text
//! POST   /api/v1/users       name=..&email=..&password=..
//! PUT    /api/v1/users/{id}
//! DELETE /api/v1/users/{id}
//! ```

use actix_web::{HttpResponse, delete, post, put, web};

use crate::domain::{FormFields, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::form::{outcome_response, parse_path_id};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Register an administrator. The password is stored hashed.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body(
        content = crate::inbound::http::schemas::UserFormSchema,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Created; redirect to the user list"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 422, description = "Validation or write failure", body = crate::domain::FormState),
        (status = 500, description = "Email uniqueness could not be checked", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users")]
pub async fn create_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<FormFields>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let outcome = state.users.create_user(&form).await?;
    Ok(outcome_response(outcome))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    request_body(
        content = crate::inbound::http::schemas::UserFormSchema,
        content_type = "application/x-www-form-urlencoded"
    ),
    responses(
        (status = 303, description = "Updated; redirect to the user list"),
        (status = 400, description = "Malformed identifier", body = crate::domain::Error),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 422, description = "Validation or write failure", body = crate::domain::FormState)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    form: web::Form<FormFields>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let id = parse_path_id::<UserId>(&path)?;
    let outcome = state.users.update_user(&id, &form).await?;
    Ok(outcome_response(outcome))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = String, Path, description = "User identifier")),
    responses(
        (status = 204, description = "User removed or already absent"),
        (status = 401, description = "Unauthorised", body = crate::domain::Error),
        (status = 503, description = "Storage unavailable", body = crate::domain::Error)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_user_id()?;
    let id = parse_path_id::<UserId>(&path)?;
    let outcome = state.users.delete_user(&id).await?;
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

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.service(create_user)
            .service(update_user)
            .service(delete_user);
    }

    #[rstest]
    #[actix_web::test]
    async fn create_redirects_to_user_list() {
        let mut ports = MockPorts::default();
        ports
            .users
            .expect_create_user()
            .withf(|fields| fields.text("email") == "ada@example.com")
            .times(1)
            .return_once(|_| Ok(MutationOutcome::redirect(Navigation::to("/dashboard/user"))));
        let app = test::init_service(test_app(ports.into_state(), routes)).await;
        let cookie = sign_in(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/users")
                .cookie(cookie)
                .set_form([
                    ("name", "Ada"),
                    ("email", "ada@example.com"),
                    ("password", "secret1"),
                ])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/dashboard/user")
        );
    }

    #[rstest]
    #[actix_web::test]
    async fn duplicate_email_is_reported_on_the_field() {
        let mut ports = MockPorts::default();
        ports.users.expect_create_user().return_once(|_| {
            let mut errors = FieldErrors::default();
            errors.push("email", "Email is already registered.");
            Ok(MutationOutcome::Failure(FormState::invalid(
                errors,
                "Missing Fields. Failed to Create User.",
            )))
        });
        let app = test::init_service(test_app(ports.into_state(), routes)).await;
        let cookie = sign_in(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/users")
                .cookie(cookie)
                .set_form([
                    ("name", "Ada"),
                    ("email", "ada@example.com"),
                    ("password", "secret1"),
                ])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["errors"]["email"][0], "Email is already registered.");
    }

    #[rstest]
    #[actix_web::test]
    async fn uniqueness_lookup_fault_is_internal() {
        let mut ports = MockPorts::default();
        ports
            .users
            .expect_create_user()
            .return_once(|_| Err(Error::internal("count failed")));
        let app = test::init_service(test_app(ports.into_state(), routes)).await;
        let cookie = sign_in(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/users")
                .cookie(cookie)
                .set_form([("name", "Ada")])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["message"], "Internal server error");
    }

    #[rstest]
    #[actix_web::test]
    async fn delete_without_session_is_rejected() {
        let mut ports = MockPorts::default();
        ports.users.expect_delete_user().times(0);
        let app = test::init_service(test_app(ports.into_state(), routes)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri("/api/v1/users/410544b2-4001-4271-9855-fec4b6a6442a")
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
