//! HTTP mapping for domain errors.
//!
//! The domain error type stays transport-agnostic; this module turns it into
//! consistent JSON payloads, status codes and a `trace-id` header.

use actix_web::{http::StatusCode, HttpResponse, ResponseError};
use serde::Serialize;
use serde_json::Value;
use tracing::error;
use utoipa::ToSchema;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};
use crate::middleware::TraceId;

/// Convenient result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, Error>;

/// Error envelope returned to clients.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    /// Stable machine-readable code.
    pub code: ErrorCode,
    /// Human-readable message.
    pub message: String,
    /// Identifier correlating the response with server logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    /// Supplementary detail, when the error carries any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

fn status_for(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
        ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
        ErrorCode::Forbidden => StatusCode::FORBIDDEN,
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Conflict => StatusCode::CONFLICT,
        ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn body_for(error: &Error) -> ErrorBody {
    let trace_id = TraceId::current().map(|id| id.to_string());
    if matches!(error.code(), ErrorCode::InternalError) {
        // Internal detail stays in the logs, not the payload.
        return ErrorBody {
            code: ErrorCode::InternalError,
            message: "internal server error".to_owned(),
            trace_id,
            details: None,
        };
    }
    ErrorBody {
        code: error.code(),
        message: error.message().to_owned(),
        trace_id,
        details: error.details().cloned(),
    }
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        status_for(self.code())
    }

    fn error_response(&self) -> HttpResponse {
        let body = body_for(self);
        let mut builder = HttpResponse::build(self.status_code());
        if let Some(id) = &body.trace_id {
            builder.insert_header((TRACE_ID_HEADER, id.clone()));
        }
        builder.json(body)
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        // Do not leak framework detail to clients.
        error!(error = %err, "actix error promoted to domain error");
        Error::internal("internal server error")
    }
}
