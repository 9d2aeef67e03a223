//! HTTP inbound adapter exposing the portal's REST endpoints.

use actix_web::web;

pub mod announcements;
pub mod auth;
pub mod error;
pub mod health;
pub mod reports;
pub mod requests;
pub mod residents;
pub mod session;
pub mod state;
#[cfg(test)]
pub mod test_utils;

pub use error::ApiResult;

/// The `/api/v1` scope with every portal endpoint registered.
///
/// Literal paths (`/requests/mine`, `/announcements/undo`) are registered
/// before their `{id}` siblings so they are not captured as identifiers.
pub fn api_scope() -> actix_web::Scope {
    web::scope("/api/v1")
        .service(auth::signup)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::create_staff)
        .service(auth::session_state)
        .service(auth::route_decision)
        .service(residents::list_residents)
        .service(residents::get_resident)
        .service(residents::update_resident)
        .service(residents::delete_resident)
        .service(requests::submit_request)
        .service(requests::list_requests)
        .service(requests::list_own_requests)
        .service(requests::get_request)
        .service(requests::approve_request)
        .service(requests::mark_ready)
        .service(requests::mark_completed)
        .service(requests::reject_request)
        .service(requests::request_revision)
        .service(requests::delete_request)
        .service(announcements::list_announcements)
        .service(announcements::publish_announcement)
        .service(announcements::undo_delete)
        .service(announcements::edit_announcement)
        .service(announcements::delete_announcement)
        .service(reports::resident_report)
        .service(reports::document_report)
}
