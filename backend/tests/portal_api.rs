//! End-to-end exercise of the portal API over the in-memory adapters.
//!
//! Covers the full resident journey (sign-up, document request, tracking)
//! and the staff journey (review lifecycle, announcements, reports) through
//! the real HTTP surface.

use std::sync::Arc;
use std::time::Duration;

use actix_session::{storage::CookieSessionStore, SessionMiddleware};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use mockable::{Clock, DefaultClock};
use serde_json::{json, Value};

use portal_backend::domain::{
    AnnouncementBoard, DocumentRequestService, EmailAddress, IdentityId, RegistrationService,
    ReportService, SessionManager, StaffGrade, StaffRecord,
};
use portal_backend::domain::ports::{ResidentRepository, StaffDirectory};
use portal_backend::inbound::http::{api_scope, state::HttpState};
use portal_backend::middleware::Trace;
use portal_backend::outbound::{MemoryAuthProvider, MemoryStore};

const UNDO_WINDOW: Duration = Duration::from_secs(300);

fn portal_state() -> HttpState {
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
        board: Arc::new(AnnouncementBoard::new(store.clone(), UNDO_WINDOW)),
        residents: store.clone(),
        staff: store.clone(),
        announcements: store,
        clock,
    }
}

macro_rules! portal_app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .wrap(
                    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
                        .cookie_name("session".to_owned())
                        .cookie_secure(false)
                        .build(),
                )
                .wrap(Trace)
                .service(api_scope()),
        )
        .await
    };
}

fn session_cookie(res: &ServiceResponse) -> Cookie<'static> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie")
        .into_owned()
}

async fn signup(
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
    email: &str,
    name: &str,
) -> (Cookie<'static>, String) {
    let res = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/auth/signup")
            .set_json(json!({
                "email": email,
                "password": "secret-1",
                "displayName": name,
                "profile": { "gender": "female", "barangay": "San Isidro" }
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let cookie = session_cookie(&res);
    let body: Value = test::read_body_json(res).await;
    (cookie, body["uid"].as_str().expect("uid").to_owned())
}

async fn staff_login(
    state: &HttpState,
    app: &impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
) -> Cookie<'static> {
    let (_, uid) = signup(app, "clerk@barangay.ph", "Clerk").await;
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

#[actix_web::test]
async fn a_request_travels_from_submission_to_pickup() {
    let state = portal_state();
    let app = portal_app!(state.clone());
    let staff = staff_login(&state, &app).await;
    let (resident, uid) = signup(&app, "ana@example.com", "Ana").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/requests")
            .cookie(resident.clone())
            .set_json(json!({
                "documentType": "certificate_of_residency",
                "purpose": "scholarship application"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let submitted: Value = test::read_body_json(res).await;
    assert_eq!(submitted["status"], "pending");
    assert_eq!(submitted["residentId"], uid.as_str());
    let id = submitted["id"].as_str().expect("request id").to_owned();

    // Staff see it in the pending queue.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/requests?status=pending")
            .cookie(staff.clone())
            .to_request(),
    )
    .await;
    let queue: Value = test::read_body_json(res).await;
    assert_eq!(queue.as_array().map(Vec::len), Some(1));

    for action in ["approve", "ready", "complete"] {
        let res = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/v1/requests/{id}/{action}"))
                .cookie(staff.clone())
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::OK, "{action}");
    }

    // The resident sees the completed request with its stamps.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/v1/requests/{id}"))
            .cookie(resident)
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
    let done: Value = test::read_body_json(res).await;
    assert_eq!(done["status"], "completed");
    assert!(done["approvedDate"].is_string());
    assert!(done["completedDate"].is_string());

    // The issuance report now counts one certificate of residency.
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/reports/documents")
            .cookie(staff)
            .to_request(),
    )
    .await;
    let report: Value = test::read_body_json(res).await;
    assert_eq!(report["totalDocumentsIssued"], 1);
    assert_eq!(report["certificateOfResidency"], 1);
    assert_eq!(report["completedRequests"], 1);
}

#[actix_web::test]
async fn rejection_records_the_reason_for_the_resident() {
    let state = portal_state();
    let app = portal_app!(state.clone());
    let staff = staff_login(&state, &app).await;
    let (resident, _) = signup(&app, "ana@example.com", "Ana").await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/requests")
            .cookie(resident.clone())
            .set_json(json!({
                "documentType": "certificate_of_indigency",
                "purpose": "medical assistance"
            }))
            .to_request(),
    )
    .await;
    let submitted: Value = test::read_body_json(res).await;
    let id = submitted["id"].as_str().expect("request id").to_owned();

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/requests/{id}/reject"))
            .cookie(staff)
            .set_json(json!({ "reason": "missing proof of income" }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);

    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/requests/mine")
            .cookie(resident)
            .to_request(),
    )
    .await;
    let mine: Value = test::read_body_json(res).await;
    assert_eq!(mine[0]["status"], "rejected");
    assert_eq!(mine[0]["rejectionReason"], "missing proof of income");
}

#[actix_web::test]
async fn an_admin_provisions_a_staff_account_that_can_log_in() {
    let state = portal_state();
    let app = portal_app!(state.clone());
    let admin = staff_login(&state, &app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/staff")
            .cookie(admin)
            .set_json(json!({
                "email": "desk@barangay.ph",
                "password": "secret-2",
                "name": "Desk Officer",
                "grade": "staff",
                "adminPassword": "secret-1"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let record: Value = test::read_body_json(res).await;
    assert_eq!(record["grade"], "staff");

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/auth/login")
            .set_json(json!({
                "email": "desk@barangay.ph",
                "password": "secret-2",
                "portal": "staff"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn announcements_reach_residents_once_active() {
    let state = portal_state();
    let app = portal_app!(state.clone());
    let staff = staff_login(&state, &app).await;

    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/announcements")
            .cookie(staff.clone())
            .set_json(json!({
                "title": "Free anti-rabies clinic",
                "content": "Saturday, covered court, 8am.",
                "category": "event"
            }))
            .to_request(),
    )
    .await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let (resident, _) = signup(&app, "ana@example.com", "Ana").await;
    let res = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/v1/announcements")
            .cookie(resident)
            .to_request(),
    )
    .await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["items"][0]["title"], "Free anti-rabies clinic");
}

#[actix_web::test]
async fn unauthenticated_requests_are_rejected() {
    let state = portal_state();
    let app = portal_app!(state);

    for uri in [
        "/api/v1/requests/mine",
        "/api/v1/residents",
        "/api/v1/announcements",
        "/api/v1/reports/residents",
    ] {
        let res = test::call_service(
            &app,
            test::TestRequest::get().uri(uri).to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{uri}");
    }
}
