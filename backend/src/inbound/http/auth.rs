//! Sign-in and sign-out handlers.
//!
//! ```text
//! POST /api/v1/login   email=user@nextmail.com&password=123456
//! POST /api/v1/logout
//! ```

use actix_web::{HttpResponse, http::header, post, web};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::AuthOutcome;
use crate::inbound::http::ApiResult;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

const SIGNED_IN_LANDING: &str = "/dashboard";
const SIGNED_OUT_LANDING: &str = "/login";

/// Sign-in form. Missing fields are treated as empty so that they fail the
/// same way as wrong credentials.
#[derive(Debug, Default, Deserialize, Serialize, utoipa::ToSchema)]
#[serde(default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

/// Body returned when sign-in is refused.
#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct LoginRejection {
    #[schema(example = "Invalid credentials.")]
    pub message: &'static str,
}

fn see_other(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Authenticate an administrator and establish a session.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body(content = LoginForm, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 303, description = "Signed in; redirect to the dashboard",
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 401, description = "Credentials refused", body = LoginRejection),
        (status = 503, description = "Credential storage unavailable", body = crate::domain::Error)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let form = form.into_inner();
    match state.login.authenticate(&form.email, &form.password).await? {
        AuthOutcome::Authenticated(user_id) => {
            session.persist_user(&user_id)?;
            Ok(see_other(SIGNED_IN_LANDING))
        }
        AuthOutcome::Rejected(failure) => {
            debug!(?failure, "sign-in refused");
            Ok(HttpResponse::Unauthorized().json(LoginRejection {
                message: failure.message(),
            }))
        }
    }
}

/// Drop the session and return to the sign-in page.
#[utoipa::path(
    post,
    path = "/api/v1/logout",
    responses((status = 303, description = "Signed out; redirect to sign-in")),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/logout")]
pub async fn logout(session: SessionContext) -> HttpResponse {
    session.end();
    see_other(SIGNED_OUT_LANDING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CredentialFailure, Error, UserId};
    use crate::inbound::http::test_utils::{MockPorts, session_cookie, sign_in, test_app};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.service(login).service(logout);
    }

    fn login_request(email: &str, password: &str) -> actix_http::Request {
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_form([("email", email), ("password", password)])
            .to_request()
    }

    #[rstest]
    #[actix_web::test]
    async fn accepted_credentials_start_a_session() {
        let mut ports = MockPorts::default();
        ports
            .login
            .expect_authenticate()
            .withf(|email, password| email == "user@nextmail.com" && password == "123456")
            .times(1)
            .return_once(|_, _| Ok(AuthOutcome::Authenticated(UserId::random())));
        let app = test::init_service(test_app(ports.into_state(), routes)).await;

        let res = test::call_service(&app, login_request("user@nextmail.com", "123456")).await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/dashboard")
        );
        assert!(!session_cookie(&res).value().is_empty());
    }

    #[rstest]
    #[case(CredentialFailure::InvalidCredentials, "Invalid credentials.")]
    #[case(CredentialFailure::Unknown, "Something went wrong.")]
    #[actix_web::test]
    async fn refused_credentials_report_message(
        #[case] failure: CredentialFailure,
        #[case] expected: &str,
    ) {
        let mut ports = MockPorts::default();
        ports
            .login
            .expect_authenticate()
            .return_once(move |_, _| Ok(AuthOutcome::Rejected(failure)));
        let app = test::init_service(test_app(ports.into_state(), routes)).await;

        let res = test::call_service(&app, login_request("user@nextmail.com", "nope")).await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert!(res.response().cookies().next().is_none());
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["message"], expected);
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_fields_reach_the_service_as_empty() {
        let mut ports = MockPorts::default();
        ports
            .login
            .expect_authenticate()
            .withf(|email, password| email.is_empty() && password.is_empty())
            .return_once(|_, _| {
                Ok(AuthOutcome::Rejected(CredentialFailure::InvalidCredentials))
            });
        let app = test::init_service(test_app(ports.into_state(), routes)).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/login")
                .set_form([("remember", "on")])
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn storage_fault_is_unavailable() {
        let mut ports = MockPorts::default();
        ports
            .login
            .expect_authenticate()
            .return_once(|_, _| Err(Error::service_unavailable("pool exhausted")));
        let app = test::init_service(test_app(ports.into_state(), routes)).await;

        let res = test::call_service(&app, login_request("user@nextmail.com", "123456")).await;

        assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);
    }

    #[rstest]
    #[actix_web::test]
    async fn logout_redirects_to_sign_in() {
        let app = test::init_service(test_app(MockPorts::default().into_state(), routes)).await;
        let cookie = sign_in(&app).await;

        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/logout")
                .cookie(cookie)
                .to_request(),
        )
        .await;

        assert_eq!(res.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            res.headers().get(header::LOCATION).and_then(|v| v.to_str().ok()),
            Some("/login")
        );
    }
}
