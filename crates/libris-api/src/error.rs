//! Error responses: `ExErrorKind` decides the status, `ExError` fills the body.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use libris_core::{ExError, ExErrorKind, LibrisError};
use serde::Serialize;
use serde_json::{json, Value};

/// An error on its way to becoming a response
#[derive(Debug)]
pub struct ApiError(pub ExError);

impl From<LibrisError> for ApiError {
    fn from(err: LibrisError) -> Self {
        ApiError(err.into())
    }
}

impl From<ExError> for ApiError {
    fn from(err: ExError) -> Self {
        ApiError(err)
    }
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    code: &'a str,
    kind: &'a str,
    message: &'a str,
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    request_id: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    detail: Option<Value>,
}

/// Status code for an error kind
pub fn status_for(kind: ExErrorKind) -> StatusCode {
    match kind {
        ExErrorKind::RouteNotFound
        | ExErrorKind::NoMatchingVersion
        | ExErrorKind::ResourceNotFound => StatusCode::NOT_FOUND,
        ExErrorKind::UnsupportedMediaType => StatusCode::UNSUPPORTED_MEDIA_TYPE,
        ExErrorKind::NotAcceptable => StatusCode::NOT_ACCEPTABLE,
        ExErrorKind::MalformedInput => StatusCode::BAD_REQUEST,
        ExErrorKind::PatchApplicationFailed | ExErrorKind::ValidationFailed => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        ExErrorKind::ConcurrencyConflict => StatusCode::CONFLICT,
        ExErrorKind::AmbiguousAction
        | ExErrorKind::InvalidRegistration
        | ExErrorKind::Persistence
        | ExErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn detail(err: &ExError) -> Option<Value> {
    if let Some(failure) = err.patch_failure() {
        return Some(json!({
            "operationIndex": failure.index,
            "op": failure.op.as_str(),
            "path": failure.path,
            "reason": failure.reason.name(),
        }));
    }
    if let Some(errors) = err.field_errors() {
        return Some(json!({ "errors": errors }));
    }
    err.candidates().map(|c| json!({ "candidates": c }))
}

fn body(err: &ExError) -> ErrorBody<'_> {
    ErrorBody {
        code: err.code(),
        kind: err.kind().name(),
        message: err.message(),
        request_id: err.request_id().map(|r| r.as_str()),
        detail: detail(err),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let err = self.0;
        let status = status_for(err.kind());
        let bytes = match serde_json::to_vec(&body(&err)) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize error body");
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };
        (
            status,
            [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            bytes,
        )
            .into_response()
    }
}
