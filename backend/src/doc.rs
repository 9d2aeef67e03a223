//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] generates the specification for the portal's REST API: every
//! `/api/v1` endpoint, the health probes, the shared schemas and the session
//! cookie security scheme. Swagger UI serves the document in debug builds.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::domain::{
    Announcement, AnnouncementCategory, Area, CivilStatus, DocumentReport, DocumentRequest,
    DocumentType, Gender, GuardKind, RequestStatus, Resident, ResidentProfile, ResidentReport,
    Role, StaffGrade, StaffRecord,
};
use crate::inbound::http::announcements::{BoardView, EditRequest, PublishRequest};
use crate::inbound::http::auth::{CreateStaffRequest, LoginRequest, SessionInfo, SignupRequest};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::requests::{ReasonRequest, SubmitRequest};
use crate::inbound::http::residents::UpdateResidentRequest;

/// Enrich the generated document with the session cookie security scheme.
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
                "Session cookie issued by POST /api/v1/auth/login.",
            ))),
        );
    }
}

/// OpenAPI document for the portal REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Barangay portal API",
        description = "HTTP interface for resident document requests, \
                       announcements and staff administration."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::auth::signup,
        crate::inbound::http::auth::login,
        crate::inbound::http::auth::logout,
        crate::inbound::http::auth::create_staff,
        crate::inbound::http::auth::session_state,
        crate::inbound::http::auth::route_decision,
        crate::inbound::http::residents::list_residents,
        crate::inbound::http::residents::get_resident,
        crate::inbound::http::residents::update_resident,
        crate::inbound::http::residents::delete_resident,
        crate::inbound::http::requests::submit_request,
        crate::inbound::http::requests::list_requests,
        crate::inbound::http::requests::list_own_requests,
        crate::inbound::http::requests::get_request,
        crate::inbound::http::requests::approve_request,
        crate::inbound::http::requests::mark_ready,
        crate::inbound::http::requests::mark_completed,
        crate::inbound::http::requests::reject_request,
        crate::inbound::http::requests::request_revision,
        crate::inbound::http::requests::delete_request,
        crate::inbound::http::announcements::list_announcements,
        crate::inbound::http::announcements::publish_announcement,
        crate::inbound::http::announcements::edit_announcement,
        crate::inbound::http::announcements::delete_announcement,
        crate::inbound::http::announcements::undo_delete,
        crate::inbound::http::reports::resident_report,
        crate::inbound::http::reports::document_report,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorBody,
        SessionInfo,
        SignupRequest,
        LoginRequest,
        CreateStaffRequest,
        UpdateResidentRequest,
        SubmitRequest,
        ReasonRequest,
        PublishRequest,
        EditRequest,
        BoardView,
        Resident,
        ResidentProfile,
        Gender,
        CivilStatus,
        DocumentRequest,
        DocumentType,
        RequestStatus,
        Announcement,
        AnnouncementCategory,
        ResidentReport,
        DocumentReport,
        StaffRecord,
        StaffGrade,
        Role,
        GuardKind,
        Area,
    )),
    tags(
        (name = "auth", description = "Sessions, sign-up and staff provisioning"),
        (name = "residents", description = "Resident profile records"),
        (name = "requests", description = "Document request lifecycle"),
        (name = "announcements", description = "Barangay announcements"),
        (name = "reports", description = "On-demand statistics"),
        (name = "health", description = "Liveness and readiness probes")
    )
)]
pub struct ApiDoc;
