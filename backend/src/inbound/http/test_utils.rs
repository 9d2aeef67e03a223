//! Test helpers for inbound HTTP components.

use std::sync::Arc;
use std::time::Duration;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use mockable::{Clock, DefaultClock};
use serde_json::{json, Value};

use crate::domain::ports::{ResidentRepository, StaffDirectory};
use crate::domain::{
    AnnouncementBoard, DocumentRequestService, EmailAddress, IdentityId, RegistrationService,
    ReportService, SessionManager, StaffGrade, StaffRecord,
};
use crate::inbound::http::api_scope;
use crate::inbound::http::state::HttpState;
use crate::middleware::Trace;
use crate::outbound::{MemoryAuthProvider, MemoryStore};

/// Undo window long enough that no test ever races a real commit.
const TEST_UNDO_WINDOW: Duration = Duration::from_secs(300);

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Build an [`HttpState`] over the in-memory store and auth provider.
///
/// The provider starts with its persisted-session check already resolved to
/// "signed out" and the session manager's listener running, so handlers that
/// wait for initialization never hang.
pub fn memory_state() -> HttpState {
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let store = Arc::new(MemoryStore::new(Arc::clone(&clock)));
    let auth = Arc::new(MemoryAuthProvider::new());
    auth.resolve_signed_out();

    let sessions = Arc::new(SessionManager::new(
        auth.clone(),
        store.clone(),
        store.clone(),
    ));
    sessions.initialize();

    HttpState {
        sessions,
        registration: Arc::new(RegistrationService::new(
            auth,
            store.clone(),
            store.clone(),
            Arc::clone(&clock),
        )),
        requests: Arc::new(DocumentRequestService::new(
            store.clone(),
            Arc::clone(&clock),
        )),
        reports: Arc::new(ReportService::new(
            store.clone(),
            store.clone(),
            Arc::clone(&clock),
        )),
        board: Arc::new(AnnouncementBoard::new(store.clone(), TEST_UNDO_WINDOW)),
        residents: store.clone(),
        staff: store.clone(),
        announcements: store,
        clock,
    }
}

/// Build the portal app over the given state, wired the way the server does
/// it: trace middleware, cookie sessions and the `/api/v1` scope.
pub fn test_app(
    state: HttpState,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(state))
        .wrap(test_session_middleware())
        .wrap(Trace)
        .service(api_scope())
}

fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

/// Sign up a resident account and return its session cookie and uid.
pub async fn signup_resident(
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
    email: &str,
) -> (Cookie<'static>, String) {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(json!({
                "email": email,
                "password": "secret-1",
                "displayName": "Ana"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let cookie = session_cookie(&res);
    let body: Value = test::read_body_json(res).await;
    let uid = body["uid"].as_str().expect("uid in signup response").to_owned();
    (cookie, uid)
}

/// Provision an admin staff account and return a logged-in staff cookie.
///
/// The account is created through the resident signup endpoint so the auth
/// provider knows the credentials; the leftover resident profile is removed
/// and a staff directory entry takes its place before logging in to the
/// staff portal.
pub async fn staff_cookie(
    state: &HttpState,
    app: &impl Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    >,
) -> Cookie<'static> {
    let (_, uid) = signup_resident(app, "clerk@barangay.ph").await;
    let uid = IdentityId::new(uid).expect("provider uid");
    state
        .residents
        .delete(&uid)
        .await
        .expect("remove placeholder profile");
    state
        .staff
        .upsert(&StaffRecord {
            uid,
            email: EmailAddress::new("clerk@barangay.ph").expect("fixture email"),
            name: "Clerk".to_owned(),
            grade: StaffGrade::Admin,
            created_at: state.clock.utc(),
            created_by: None,
        })
        .await
        .expect("seed staff record");

    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({
                "email": "clerk@barangay.ph",
                "password": "secret-1",
                "portal": "staff"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    session_cookie(&res)
}
