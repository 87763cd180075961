//! Canonical schema constants for structured logging and events
//!
//! These constants keep log fields, error bodies and correlation headers
//! consistent across crates.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Entity identifiers
pub const FIELD_AUTHOR_ID: &str = "author_id";
pub const FIELD_BOOK_ID: &str = "book_id";

// Action selection
pub const FIELD_ACTION: &str = "action";
pub const FIELD_API_VERSION: &str = "api_version";
pub const FIELD_MEDIA_TYPE: &str = "media_type";

// Patch runs
pub const FIELD_OP_COUNT: &str = "op_count";
pub const FIELD_OP_INDEX: &str = "op_index";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

// Correlation headers
pub const HEADER_REQUEST_ID: &str = "x-request-id";
pub const HEADER_TRACE_ID: &str = "x-trace-id";
