//! Document request handlers.
//!
//! Residents submit and track their own requests; staff list, filter and
//! move requests through the review lifecycle.

use actix_web::{delete, get, post, web, HttpResponse};
use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::ResidentRepository as _;
use crate::domain::{
    DocumentRequest, DocumentType, Error, RecordId, RequestStatus, RequestSubmission, Role,
};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Body for `POST /api/v1/requests`.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SubmitRequest {
    pub document_type: DocumentType,
    pub purpose: String,
    #[serde(default)]
    pub attachment_url: Option<String>,
}

/// Body for reject and revision transitions.
#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReasonRequest {
    pub reason: String,
}

/// Query for `GET /api/v1/requests`.
#[derive(Debug, Deserialize, IntoParams)]
pub struct ListQuery {
    /// Restrict the listing to one lifecycle status.
    pub status: Option<RequestStatus>,
}

/// Submit a document request (resident only).
#[utoipa::path(
    post,
    path = "/api/v1/requests",
    request_body = SubmitRequest,
    responses(
        (status = 201, description = "Submitted request", body = DocumentRequest),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 403, description = "Resident access required", body = ErrorBody)
    ),
    tags = ["requests"],
    operation_id = "submitRequest"
)]
#[post("/requests")]
pub async fn submit_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<SubmitRequest>,
) -> ApiResult<HttpResponse> {
    let uid = session.require_resident()?;
    let resident = state
        .residents
        .find_by_id(&uid)
        .await
        .map_err(Error::from)?
        .ok_or_else(|| Error::not_found("no resident profile for this account"))?;
    let payload = payload.into_inner();
    let request = state
        .requests
        .submit(
            &resident,
            RequestSubmission {
                document_type: payload.document_type,
                purpose: payload.purpose,
                attachment_url: payload.attachment_url,
            },
        )
        .await?;
    Ok(HttpResponse::Created().json(request))
}

/// List requests, optionally filtered by status (staff only).
#[utoipa::path(
    get,
    path = "/api/v1/requests",
    params(ListQuery),
    responses(
        (status = 200, description = "Requests", body = [DocumentRequest]),
        (status = 403, description = "Staff access required", body = ErrorBody)
    ),
    tags = ["requests"],
    operation_id = "listRequests"
)]
#[get("/requests")]
pub async fn list_requests(
    state: web::Data<HttpState>,
    session: SessionContext,
    query: web::Query<ListQuery>,
) -> ApiResult<web::Json<Vec<DocumentRequest>>> {
    session.require_staff()?;
    let requests = match query.status {
        Some(status) => state.requests.list_by_status(status).await?,
        None => state.requests.list_all().await?,
    };
    Ok(web::Json(requests))
}

/// List the signed-in resident's own requests.
#[utoipa::path(
    get,
    path = "/api/v1/requests/mine",
    responses(
        (status = 200, description = "Requests", body = [DocumentRequest]),
        (status = 403, description = "Resident access required", body = ErrorBody)
    ),
    tags = ["requests"],
    operation_id = "listOwnRequests"
)]
#[get("/requests/mine")]
pub async fn list_own_requests(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<Vec<DocumentRequest>>> {
    let uid = session.require_resident()?;
    Ok(web::Json(state.requests.list_by_resident(&uid).await?))
}

/// Fetch one request (staff, or the resident who submitted it).
#[utoipa::path(
    get,
    path = "/api/v1/requests/{id}",
    responses(
        (status = 200, description = "Request", body = DocumentRequest),
        (status = 403, description = "Not your request", body = ErrorBody),
        (status = 404, description = "No such request", body = ErrorBody)
    ),
    tags = ["requests"],
    operation_id = "getRequest"
)]
#[get("/requests/{id}")]
pub async fn get_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DocumentRequest>> {
    let (uid, role) = session.require_identity()?;
    let request = state.requests.get(&RecordId::new(path.into_inner())).await?;
    if role != Role::Staff && request.resident_id != uid {
        return Err(Error::forbidden("you may only view your own requests"));
    }
    Ok(web::Json(request))
}

/// Approve a pending request (staff only).
#[utoipa::path(
    post,
    path = "/api/v1/requests/{id}/approve",
    responses(
        (status = 200, description = "Approved request", body = DocumentRequest),
        (status = 403, description = "Staff access required", body = ErrorBody),
        (status = 409, description = "Request is not pending", body = ErrorBody)
    ),
    tags = ["requests"],
    operation_id = "approveRequest"
)]
#[post("/requests/{id}/approve")]
pub async fn approve_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DocumentRequest>> {
    let staff_uid = session.require_staff()?;
    let request = state
        .requests
        .approve(&RecordId::new(path.into_inner()), staff_uid)
        .await?;
    Ok(web::Json(request))
}

/// Mark an approved request's document as ready for pickup (staff only).
#[utoipa::path(
    post,
    path = "/api/v1/requests/{id}/ready",
    responses(
        (status = 200, description = "Request ready for pickup", body = DocumentRequest),
        (status = 409, description = "Request is not approved", body = ErrorBody)
    ),
    tags = ["requests"],
    operation_id = "markRequestReady"
)]
#[post("/requests/{id}/ready")]
pub async fn mark_ready(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DocumentRequest>> {
    session.require_staff()?;
    let request = state
        .requests
        .mark_ready(&RecordId::new(path.into_inner()))
        .await?;
    Ok(web::Json(request))
}

/// Mark a ready request as picked up (staff only).
#[utoipa::path(
    post,
    path = "/api/v1/requests/{id}/complete",
    responses(
        (status = 200, description = "Completed request", body = DocumentRequest),
        (status = 409, description = "Request is not ready for pickup", body = ErrorBody)
    ),
    tags = ["requests"],
    operation_id = "completeRequest"
)]
#[post("/requests/{id}/complete")]
pub async fn mark_completed(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<DocumentRequest>> {
    session.require_staff()?;
    let request = state
        .requests
        .mark_completed(&RecordId::new(path.into_inner()))
        .await?;
    Ok(web::Json(request))
}

/// Reject a request with a reason (staff only).
#[utoipa::path(
    post,
    path = "/api/v1/requests/{id}/reject",
    request_body = ReasonRequest,
    responses(
        (status = 200, description = "Rejected request", body = DocumentRequest),
        (status = 400, description = "A reason is required", body = ErrorBody),
        (status = 409, description = "Request cannot be rejected", body = ErrorBody)
    ),
    tags = ["requests"],
    operation_id = "rejectRequest"
)]
#[post("/requests/{id}/reject")]
pub async fn reject_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReasonRequest>,
) -> ApiResult<web::Json<DocumentRequest>> {
    session.require_staff()?;
    let request = state
        .requests
        .reject(&RecordId::new(path.into_inner()), &payload.reason)
        .await?;
    Ok(web::Json(request))
}

/// Return a request to the resident for revision (staff only).
#[utoipa::path(
    post,
    path = "/api/v1/requests/{id}/revision",
    request_body = ReasonRequest,
    responses(
        (status = 200, description = "Request returned for revision", body = DocumentRequest),
        (status = 400, description = "A reason is required", body = ErrorBody)
    ),
    tags = ["requests"],
    operation_id = "requestRevision"
)]
#[post("/requests/{id}/revision")]
pub async fn request_revision(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<ReasonRequest>,
) -> ApiResult<web::Json<DocumentRequest>> {
    session.require_staff()?;
    let request = state
        .requests
        .request_revision(&RecordId::new(path.into_inner()), &payload.reason)
        .await?;
    Ok(web::Json(request))
}

/// Remove a request outright (staff only).
#[utoipa::path(
    delete,
    path = "/api/v1/requests/{id}",
    responses(
        (status = 204, description = "Removed"),
        (status = 403, description = "Staff access required", body = ErrorBody)
    ),
    tags = ["requests"],
    operation_id = "deleteRequest"
)]
#[delete("/requests/{id}")]
pub async fn delete_request(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    session.require_staff()?;
    state
        .requests
        .delete(&RecordId::new(path.into_inner()))
        .await?;
    Ok(HttpResponse::NoContent().finish())
}
