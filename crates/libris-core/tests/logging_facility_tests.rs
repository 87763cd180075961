#![allow(clippy::unwrap_used, clippy::expect_used)]

use libris_core::errors::{ExErrorKind, LibrisError};
use libris_core::logging_facility::test_capture::init_test_capture;
use libris_core::{log_op_end, log_op_error, log_op_start};
use libris_core_types::schema::{
    EVENT_END, EVENT_END_ERROR, EVENT_START, FIELD_COMPONENT, FIELD_ERR_CODE, FIELD_ERR_KIND,
};

#[test]
fn test_log_op_start_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_start_unique_1";

    log_op_start!(op_name, author_id = "a1");

    let starts: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_START))
        .collect();
    assert_eq!(starts.len(), 1);
    assert_eq!(starts[0].field("author_id"), Some("a1"));
    assert_eq!(starts[0].field(FIELD_COMPONENT), Some(module_path!()));
}

#[test]
fn test_log_op_end_macro() {
    let capture = init_test_capture();
    let op_name = "test_log_op_end_unique_2";

    log_op_end!(op_name, duration_ms = 42);

    let ends: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END))
        .collect();
    assert_eq!(ends.len(), 1, "Should have exactly one end event");
    assert_eq!(ends[0].field("duration_ms"), Some("42"));
}

#[test]
fn test_log_op_error_includes_kind_and_code() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_3";

    let err = LibrisError::AuthorNotFound {
        author_id: "a1".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 10);

    let errors: Vec<_> = capture
        .events_for_op(op_name)
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_END_ERROR))
        .collect();
    assert_eq!(errors.len(), 1, "Should have exactly one error event");
    assert_eq!(
        errors[0].field(FIELD_ERR_CODE),
        Some(ExErrorKind::ResourceNotFound.code())
    );
    assert_eq!(errors[0].field(FIELD_ERR_KIND), Some("ResourceNotFound"));
    assert_eq!(errors[0].level, tracing::Level::WARN);
}

#[test]
fn test_log_op_error_service_failure_is_error_level() {
    let capture = init_test_capture();
    let op_name = "test_log_op_error_unique_5";

    let err = LibrisError::Persistence {
        message: "lock poisoned".to_string(),
    };
    log_op_error!(op_name, err, duration_ms = 2, author_id = "a1");

    let errors = capture.events_for_op(op_name);
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].level, tracing::Level::ERROR);
    assert_eq!(errors[0].field(FIELD_ERR_CODE), Some(ExErrorKind::Persistence.code()));
    assert_eq!(errors[0].field("author_id"), Some("a1"));
}

#[test]
fn test_boundary_pairs_start_with_single_end() {
    let capture = init_test_capture();
    let op_name = "test_boundary_unique_4";

    log_op_start!(op_name);
    log_op_end!(op_name, duration_ms = 1);

    capture.assert_event_exists(op_name, EVENT_START);
    capture.assert_event_exists(op_name, EVENT_END);
    assert_eq!(
        capture.count_events(|e| e.op.as_deref() == Some(op_name)),
        2
    );
}
