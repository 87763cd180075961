//! Operation boundary macros
//!
//! Each command logs one `start` event and exactly one `end` or `end_error`
//! event carrying the same `op`, so the pair can be joined downstream.

/// Log the start of an operation
///
/// ```
/// # use libris_core::log_op_start;
/// log_op_start!("get_author");
/// log_op_start!("get_author", author_id = "a1");
/// ```
#[macro_export]
macro_rules! log_op_start {
    ($op:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = libris_core_types::schema::EVENT_START,
            $($($field)*)?
        );
    };
}

/// Log the successful end of an operation; `duration_ms` is mandatory
///
/// ```
/// # use libris_core::log_op_end;
/// log_op_end!("list_books", duration_ms = 3, count = 2);
/// ```
#[macro_export]
macro_rules! log_op_end {
    ($op:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {
        tracing::info!(
            component = module_path!(),
            op = $op,
            event = libris_core_types::schema::EVENT_END,
            duration_ms = $duration,
            $($($field)*)?
        );
    };
}

/// Log the failed end of an operation
///
/// `$err` is anything convertible into `ExError`. Failures the caller caused
/// (unknown resource, bad input, negotiation) are logged at WARN, the rest
/// at ERROR.
///
/// ```
/// # use libris_core::{log_op_error, errors::LibrisError};
/// let err = LibrisError::AuthorNotFound { author_id: "a1".to_string() };
/// log_op_error!("get_author", err, duration_ms = 1);
/// ```
#[macro_export]
macro_rules! log_op_error {
    ($op:expr, $err:expr, duration_ms = $duration:expr $(, $($field:tt)*)?) => {{
        let ex_err: $crate::errors::ExError = $err.into();
        if ex_err.kind().is_client_error() {
            tracing::warn!(
                component = module_path!(),
                op = $op,
                event = libris_core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err_kind = ex_err.kind().name(),
                err_code = ex_err.code(),
                $($($field)*)?
            );
        } else {
            tracing::error!(
                component = module_path!(),
                op = $op,
                event = libris_core_types::schema::EVENT_END_ERROR,
                duration_ms = $duration,
                err_kind = ex_err.kind().name(),
                err_code = ex_err.code(),
                $($($field)*)?
            );
        }
    }};
}
