//! Authentication and account provisioning handlers.
//!
//! ```text
//! POST /api/v1/auth/signup  {"email":"ana@example.com","password":"...","displayName":"Ana"}
//! POST /api/v1/auth/login   {"email":"ana@example.com","password":"...","portal":"resident"}
//! POST /api/v1/auth/logout
//! POST /api/v1/auth/staff   (admin only)
//! GET  /api/v1/auth/session
//! GET  /api/v1/auth/route?guard=staff
//! ```

use actix_web::{get, post, web, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{IntoParams, ToSchema};

use crate::domain::guard::{decide, GuardDecision, GuardKind};
use crate::domain::ports::StaffDirectory as _;
use crate::domain::{
    Credentials, EmailAddress, Error, IdentityId, NewStaffAccount, ResidentProfile, Role,
    StaffGrade, StaffRecord,
};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Body for `POST /api/v1/auth/signup`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub display_name: String,
    /// Optional intake details; missing fields use the form defaults.
    #[serde(default)]
    pub profile: ResidentProfile,
}

/// Body for `POST /api/v1/auth/login`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Which portal the user is signing in to.
    pub portal: Role,
}

/// Body for `POST /api/v1/auth/staff`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateStaffRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub grade: StaffGrade,
    /// The acting admin's own password, needed to restore their provider
    /// session after the new account is created.
    pub admin_password: String,
}

/// Session summary returned after login and by `GET /auth/session`.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    #[schema(value_type = Option<String>)]
    pub uid: Option<IdentityId>,
    pub role: Option<Role>,
}

/// Query for `GET /api/v1/auth/route`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct RouteQuery {
    /// Which guard to evaluate.
    pub guard: GuardKind,
}

fn parse_credentials(email: &str, password: &str) -> Result<Credentials, Error> {
    Credentials::try_from_parts(email, password)
        .map_err(|err| Error::invalid_request(err.to_string()))
}

/// Register a resident account and sign it in.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signup",
    request_body = SignupRequest,
    responses(
        (status = 201, description = "Account created", body = SessionInfo),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody),
        (status = 503, description = "Identity provider unavailable", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "signup",
    security([])
)]
#[post("/auth/signup")]
pub async fn signup(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SignupRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let email = EmailAddress::new(payload.email)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let (identity, _resident) = state
        .registration
        .sign_up_resident(
            &email,
            &payload.password,
            &payload.display_name,
            payload.profile,
        )
        .await?;
    session.persist(&identity.uid, Role::Resident)?;
    Ok(HttpResponse::Created().json(SessionInfo {
        uid: Some(identity.uid),
        role: Some(Role::Resident),
    }))
}

/// Sign in to the staff or resident portal.
///
/// An account whose stored role does not match the requested portal is
/// signed out again and the login fails.
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", body = SessionInfo,
            headers(("Set-Cookie" = String, description = "Session cookie"))),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Invalid credentials", body = ErrorBody),
        (status = 403, description = "Role mismatch for this portal", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "login",
    security([])
)]
#[post("/auth/login")]
pub async fn login(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let payload = payload.into_inner();
    let credentials = parse_credentials(&payload.email, &payload.password)?;
    let snapshot = state.sessions.login(&credentials, payload.portal).await?;
    let uid = snapshot
        .identity
        .as_ref()
        .map(|identity| identity.uid.clone())
        .ok_or_else(|| Error::internal("login succeeded without an identity"))?;
    session.persist(&uid, payload.portal)?;
    Ok(HttpResponse::Ok().json(SessionInfo {
        uid: Some(uid),
        role: Some(payload.portal),
    }))
}

/// Sign out and destroy the session cookie.
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Signed out")
    ),
    tags = ["auth"],
    operation_id = "logout",
    security([])
)]
#[post("/auth/logout")]
pub async fn logout(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    state.sessions.logout().await?;
    session.purge();
    Ok(HttpResponse::NoContent().finish())
}

/// Provision a staff account (admin only).
#[utoipa::path(
    post,
    path = "/api/v1/auth/staff",
    request_body = CreateStaffRequest,
    responses(
        (status = 201, description = "Staff account created", body = StaffRecord),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 403, description = "Admin access required", body = ErrorBody),
        (status = 409, description = "Email already registered", body = ErrorBody)
    ),
    tags = ["auth"],
    operation_id = "createStaff"
)]
#[post("/auth/staff")]
pub async fn create_staff(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<CreateStaffRequest>,
) -> ApiResult<HttpResponse> {
    let admin_uid = session.require_staff()?;
    let acting_admin = state
        .staff
        .find_by_id(&admin_uid)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| Error::forbidden("no staff record for this session"))?;
    let payload = payload.into_inner();
    let email = EmailAddress::new(payload.email)
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    let admin_credentials =
        parse_credentials(acting_admin.email.as_ref(), &payload.admin_password)?;
    let record = state
        .registration
        .create_staff_as_admin(
            &acting_admin,
            &admin_credentials,
            NewStaffAccount {
                email,
                password: payload.password,
                name: payload.name,
                grade: payload.grade,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(record))
}

/// Current session state.
///
/// Waits for the identity provider's persisted-session check, so the answer
/// is never "signed out" merely because the provider has not reported yet.
#[utoipa::path(
    get,
    path = "/api/v1/auth/session",
    responses(
        (status = 200, description = "Session state", body = SessionInfo)
    ),
    tags = ["auth"],
    operation_id = "sessionState",
    security([])
)]
#[get("/auth/session")]
pub async fn session_state(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    state.sessions.wait_until_initialized().await;
    Ok(HttpResponse::Ok().json(SessionInfo {
        uid: session.identity_id()?,
        role: session.role()?,
    }))
}

/// Evaluate a routing guard for the SPA shell.
#[utoipa::path(
    get,
    path = "/api/v1/auth/route",
    params(RouteQuery),
    responses(
        (status = 200, description = "Routing decision")
    ),
    tags = ["auth"],
    operation_id = "routeDecision",
    security([])
)]
#[get("/auth/route")]
pub async fn route_decision(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<RouteQuery>,
) -> ApiResult<HttpResponse> {
    state.sessions.wait_until_initialized().await;
    let identity_present = session.identity_id()?.is_some();
    let role = session.role()?;
    let decision = decide(query.guard, identity_present, role);
    let body = match decision {
        GuardDecision::Allow => json!({ "action": "allow" }),
        GuardDecision::Redirect(area) => {
            json!({ "action": "redirect", "location": area.path() })
        }
    };
    Ok(HttpResponse::Ok().json(body))
}
