use axum::body::{to_bytes, Body};
use axum::http::{Request, Response};
use axum::Router;
use libris_api::{build_router, AppState};
use libris_core::model::{Author, Book, NewBook};
use libris_core::{InMemoryStore, SelectorOptions};
use serde_json::Value;
use tower::ServiceExt;

/// A router over a store holding one author with one book
#[allow(dead_code)]
pub fn seeded_app() -> (Router, InMemoryStore, Author, Book) {
    seeded_app_with(SelectorOptions::default())
}

/// Same as [`seeded_app`] with custom selector options
#[allow(dead_code)]
pub fn seeded_app_with(options: SelectorOptions) -> (Router, InMemoryStore, Author, Book) {
    let store = InMemoryStore::new();
    let author = Author::new("George", "Martin");
    store.insert_author(author.clone()).unwrap();
    let book = NewBook {
        title: "A Game of Thrones".to_string(),
        description: Some("The first book of A Song of Ice and Fire".to_string()),
        amount_of_pages: None,
    }
    .into_book(author.id);
    store.insert_book(book.clone()).unwrap();

    let state = AppState::new(options, store.clone()).unwrap();
    (build_router(state), store, author, book)
}

/// Build a request; `body` is sent as-is with `content_type`
#[allow(dead_code)]
pub fn request(
    method: &str,
    uri: &str,
    headers: &[(&str, &str)],
    body: Option<(&str, Value)>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    for (name, value) in headers {
        builder = builder.header(*name, *value);
    }
    match body {
        Some((content_type, value)) => builder
            .header("content-type", content_type)
            .body(Body::from(serde_json::to_vec(&value).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Send one request through the router
#[allow(dead_code)]
pub async fn send(app: &Router, request: Request<Body>) -> Response<Body> {
    app.clone().oneshot(request).await.unwrap()
}

/// Read a response body as JSON
#[allow(dead_code)]
pub async fn json_body(response: Response<Body>) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// A response header as a string
#[allow(dead_code)]
pub fn header<'r>(response: &'r Response<Body>, name: &str) -> Option<&'r str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}
