//! The single entry point for every request.
//!
//! The route table, not axum's router, decides which handler runs: each
//! request is selected by method, path, version and media types, then the
//! matching engine command is called with a fresh repository session.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{header, HeaderMap, HeaderName, HeaderValue, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use libris_core::representation::{BookInputKind, BookKind};
use libris_core::{
    ApiVersion, HttpMethod, LibraryRepository, LibrisError, MediaType, Result, SelectionRequest,
};
use libris_core_types::schema::{HEADER_REQUEST_ID, HEADER_TRACE_ID};
use libris_core_types::RequestContext;
use libris_engine::commands::{authors, books};
use serde_json::Value;
use uuid::Uuid;

use crate::error::ApiError;
use crate::routes::Action;
use crate::AppState;

/// Lists every version the matched route serves
pub const HEADER_SUPPORTED_VERSIONS: &str = "api-supported-versions";

/// Fallback handler the router sends every request to
pub async fn dispatch(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let header_value = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
    let context =
        RequestContext::from_headers(header_value(HEADER_REQUEST_ID), header_value(HEADER_TRACE_ID));
    let trace_id = context.trace_id.as_ref().map(|t| t.as_str());
    let span = tracing::info_span!(
        "request",
        request_id = %context.request_id,
        trace_id = tracing::field::Empty,
        method = %method,
        path = %uri.path()
    );
    if let Some(trace_id) = trace_id {
        span.record("trace_id", trace_id);
    }

    let mut response = span.in_scope(|| {
        handle(&state, &method, &uri, &headers, &body).unwrap_or_else(|err| {
            let err = err.0.with_request_id(context.request_id.clone());
            tracing::info!(
                request_id = %context.request_id,
                trace_id,
                err_code = err.code(),
                status = crate::error::status_for(err.kind()).as_u16(),
                "request failed"
            );
            ApiError(err).into_response()
        })
    });

    if let Ok(value) = HeaderValue::from_str(context.request_id.as_str()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(HEADER_REQUEST_ID), value);
    }
    response
}

fn handle(
    state: &AppState,
    method: &Method,
    uri: &Uri,
    headers: &HeaderMap,
    body: &[u8],
) -> std::result::Result<Response, ApiError> {
    let path = uri.path();
    let http_method: HttpMethod = method.as_str().parse().map_err(|_| LibrisError::RouteNotFound {
        method: method.to_string(),
        path: path.to_string(),
    })?;
    let header_value = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());

    let request = SelectionRequest {
        method: http_method,
        path,
        accept: header_value(header::ACCEPT.as_str()),
        content_type: header_value(header::CONTENT_TYPE.as_str()),
        version_token: state
            .selector
            .options()
            .version_source
            .extract(None, header_value, uri.query()),
    };
    let selection = state.selector.select(&request)?;
    let action = *selection.descriptor.action();
    tracing::info!(action = action.name(), api_version = %selection.version, "dispatching");

    let param = |name: &str| selection.param(name).unwrap_or_default();
    let mut repo = state.store.session();
    let author_id = Uuid::parse_str(param("authorId")).ok();
    if matches!(action, Action::UpdateAuthor | Action::PatchAuthor) {
        if let (Some(id), Some(version)) = (author_id, if_match(headers)?) {
            repo.expect_author_version(id, version);
        }
    }

    let (status, value, mut extra) = match action {
        Action::GetAuthors => (StatusCode::OK, Value::Array(authors::list_authors(&repo)?), vec![]),
        Action::GetAuthor => (StatusCode::OK, authors::get_author(&repo, param("authorId"))?, vec![]),
        Action::UpdateAuthor => (
            StatusCode::OK,
            authors::update_author(&mut repo, param("authorId"), body)?,
            vec![],
        ),
        Action::PatchAuthor => (
            StatusCode::OK,
            authors::patch_author(&mut repo, param("authorId"), body)?,
            vec![],
        ),
        Action::GetBooks => (
            StatusCode::OK,
            Value::Array(books::list_books(&repo, param("authorId"))?),
            vec![],
        ),
        Action::GetBook | Action::GetBookWithConcatenatedAuthorName => {
            let kind = if action == Action::GetBook {
                BookKind::Book
            } else {
                BookKind::BookWithConcatenatedAuthorName
            };
            let book = books::get_book(&repo, param("authorId"), param("bookId"), kind)?;
            (StatusCode::OK, book, vec![])
        }
        Action::CreateBook | Action::CreateBookWithAmountOfPages => {
            let kind = if action == Action::CreateBook {
                BookInputKind::BookForCreation
            } else {
                BookInputKind::BookForCreationWithAmountOfPages
            };
            let created = books::create_book(&mut repo, param("authorId"), body, kind)?;
            let author_id = created.author_id.to_string();
            let book_id = created.book_id.to_string();
            let location = state
                .selector
                .link(&Action::GetBook, &[("authorId", &author_id), ("bookId", &book_id)])
                .ok_or_else(|| LibrisError::Internal {
                    message: "no route to link created book".to_string(),
                })?;
            (StatusCode::CREATED, created.representation, vec![(header::LOCATION, location)])
        }
    };

    if matches!(action, Action::GetAuthor | Action::UpdateAuthor | Action::PatchAuthor) {
        if let Some(id) = author_id {
            // Fresh session: this one may read through an If-Match version
            if let Some(author) = state.store.session().get_author(id)? {
                extra.push((header::ETAG, format!("\"{}\"", author.version)));
            }
        }
    }

    respond(
        status,
        &value,
        &selection.response_type,
        &selection.supported_versions,
        extra,
    )
    .map_err(ApiError::from)
}

/// The author version named by `If-Match`; `*` or no header means none
fn if_match(headers: &HeaderMap) -> Result<Option<u64>> {
    let Some(value) = headers.get(header::IF_MATCH) else {
        return Ok(None);
    };
    let raw = value
        .to_str()
        .map_err(|_| LibrisError::malformed_field("If-Match", "not a visible ASCII value"))?
        .trim();
    if raw == "*" {
        return Ok(None);
    }
    raw.trim_start_matches("W/")
        .trim_matches('"')
        .parse()
        .map(Some)
        .map_err(|_| {
            LibrisError::malformed_field("If-Match", format!("'{}' is not an author version", raw))
        })
}

fn respond(
    status: StatusCode,
    value: &Value,
    content_type: &MediaType,
    supported_versions: &[ApiVersion],
    extra: Vec<(HeaderName, String)>,
) -> Result<Response> {
    let internal = |message: String| LibrisError::Internal { message };
    let bytes = serde_json::to_vec(value).map_err(|e| internal(e.to_string()))?;

    let mut response = (status, bytes).into_response();
    let headers = response.headers_mut();
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_str(&content_type.to_string()).map_err(|e| internal(e.to_string()))?,
    );
    let versions = supported_versions
        .iter()
        .map(ApiVersion::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    if !versions.is_empty() {
        headers.insert(
            HeaderName::from_static(HEADER_SUPPORTED_VERSIONS),
            HeaderValue::from_str(&versions).map_err(|e| internal(e.to_string()))?,
        );
    }
    for (name, value) in extra {
        headers.insert(
            name,
            HeaderValue::from_str(&value).map_err(|e| internal(e.to_string()))?,
        );
    }
    Ok(response)
}
