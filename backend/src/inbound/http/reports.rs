//! Statistics report handlers (staff only).

use actix_web::{get, web};

use crate::domain::{DocumentReport, ResidentReport};
use crate::inbound::http::error::ErrorBody;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::ApiResult;

/// Demographic summary of the resident collection.
#[utoipa::path(
    get,
    path = "/api/v1/reports/residents",
    responses(
        (status = 200, description = "Resident demographics", body = ResidentReport),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 403, description = "Staff access required", body = ErrorBody)
    ),
    tags = ["reports"],
    operation_id = "residentReport"
)]
#[get("/reports/residents")]
pub async fn resident_report(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<ResidentReport>> {
    session.require_staff()?;
    Ok(web::Json(state.reports.resident_report().await?))
}

/// Issuance and workload summary of the request collection.
#[utoipa::path(
    get,
    path = "/api/v1/reports/documents",
    responses(
        (status = 200, description = "Document issuance summary", body = DocumentReport),
        (status = 401, description = "Login required", body = ErrorBody),
        (status = 403, description = "Staff access required", body = ErrorBody)
    ),
    tags = ["reports"],
    operation_id = "documentReport"
)]
#[get("/reports/documents")]
pub async fn document_report(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<web::Json<DocumentReport>> {
    session.require_staff()?;
    Ok(web::Json(state.reports.document_report().await?))
}
