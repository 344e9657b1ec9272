//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};

use crate::domain::{Error, UserId};

use crate::domain::ports::{
    MockCustomerCommand, MockInvoiceCommand, MockLoginService, MockUserCommand,
};

use super::session::SessionContext;
use super::state::HttpState;

const SIGNED_IN_USER: &str = "410544b2-4001-4271-9855-fec4b6a6442a";

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation and disables the `Secure` flag for
/// local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Mocks for every driving port; unset expectations panic when called.
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub invoices: MockInvoiceCommand,
    pub customers: MockCustomerCommand,
    pub users: MockUserCommand,
}

impl MockPorts {
    pub fn into_state(self) -> HttpState {
        HttpState::new(
            Arc::new(self.login),
            Arc::new(self.invoices),
            Arc::new(self.customers),
            Arc::new(self.users),
        )
    }
}

/// Extract the session cookie set on `res`.
pub fn session_cookie<B>(res: &ServiceResponse<B>) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// App with session support, `state`, a `/test/sign-in` shortcut and the
/// handlers registered by `configure` under `/api/v1`.
pub fn test_app(
    state: HttpState,
    configure: impl FnOnce(&mut web::ServiceConfig),
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .route(
            "/test/sign-in",
            web::get().to(|session: SessionContext| async move {
                let id = UserId::new(SIGNED_IN_USER).expect("fixture id");
                session.persist_user(&id)?;
                Ok::<_, Error>(HttpResponse::Ok())
            }),
        )
        .service(web::scope("/api/v1").configure(configure))
}

/// Session cookie for a signed-in user.
pub async fn sign_in<S, B>(app: &S) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse<B>, Error = actix_web::Error>,
{
    let res = test::call_service(app, test::TestRequest::get().uri("/test/sign-in").to_request())
        .await;
    session_cookie(&res)
}
