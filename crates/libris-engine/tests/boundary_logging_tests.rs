#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{body, seeded_store};
use libris_core::logging_facility::test_capture::init_test_capture;
use libris_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_AUTHOR_ID, FIELD_BOOK_ID, FIELD_DURATION_MS,
    FIELD_ERR_CODE, FIELD_OP_COUNT, FIELD_OP_INDEX,
};
use libris_core::representation::BookKind;
use libris_engine::commands::authors::{get_author, patch_author};
use libris_engine::commands::books::get_book;
use serde_json::json;
use uuid::Uuid;

#[test]
fn test_command_logs_start_and_end() {
    let capture = init_test_capture();
    let (store, author, _) = seeded_store();

    get_author(&store.session(), &author.id.to_string()).unwrap();

    let id = author.id.to_string();
    let events = capture.events_for_op("get_author");
    assert!(events
        .iter()
        .any(|e| e.event.as_deref() == Some(EVENT_START) && e.field(FIELD_AUTHOR_ID) == Some(id.as_str())));
    assert!(events
        .iter()
        .any(|e| e.event.as_deref() == Some(EVENT_END) && e.field(FIELD_DURATION_MS).is_some()));
}

#[test]
fn test_book_lookup_logs_both_ids() {
    let capture = init_test_capture();
    let (store, author, book) = seeded_store();
    let book_id = book.id.to_string();

    get_book(&store.session(), &author.id.to_string(), &book_id, BookKind::Book).unwrap();

    assert!(capture.events_for_op("get_book").iter().any(|e| {
        e.event.as_deref() == Some(EVENT_START) && e.field(FIELD_BOOK_ID) == Some(book_id.as_str())
    }));
}

#[test]
fn test_applied_patch_logs_operation_count() {
    let capture = init_test_capture();
    let (store, author, _) = seeded_store();
    let doc = body(json!([
        {"op": "test", "path": "/firstName", "value": "George"},
        {"op": "replace", "path": "/firstName", "value": "G."}
    ]));

    patch_author(&mut store.session(), &author.id.to_string(), &doc).unwrap();

    let id = author.id.to_string();
    let applied = capture.count_events(|e| {
        e.field(FIELD_AUTHOR_ID) == Some(id.as_str()) && e.field(FIELD_OP_COUNT) == Some("2")
    });
    assert_eq!(applied, 1);
}

#[test]
fn test_failed_patch_logs_error_with_index() {
    let capture = init_test_capture();
    let (store, author, _) = seeded_store();
    let doc = body(json!([
        {"op": "test", "path": "/firstName", "value": "George"},
        {"op": "test", "path": "/firstName", "value": "Jon"}
    ]));

    patch_author(&mut store.session(), &author.id.to_string(), &doc).unwrap_err();

    let errors: Vec<_> = capture
        .events_for_op("patch_author")
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .filter(|e| e.field(FIELD_OP_INDEX) == Some("1"))
        .collect();
    assert!(!errors.is_empty());
    assert_eq!(errors[0].field(FIELD_ERR_CODE), Some("ERR_PATCH_APPLICATION_FAILED"));
}

#[test]
fn test_unknown_author_logs_not_found() {
    let capture = init_test_capture();
    let (store, _, _) = seeded_store();
    let missing = Uuid::new_v4().to_string();

    get_author(&store.session(), &missing).unwrap_err();

    let start = capture
        .events_for_op("get_author")
        .into_iter()
        .any(|e| e.event.as_deref() == Some(EVENT_START) && e.field(FIELD_AUTHOR_ID) == Some(missing.as_str()));
    assert!(start);
    assert!(capture.count_events(|e| {
        e.op.as_deref() == Some("get_author")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field(FIELD_ERR_CODE) == Some("ERR_RESOURCE_NOT_FOUND")
    }) >= 1);
}
