//! Structured logging for Libris
//!
//! `init(profile)` installs the process subscriber once. The boundary macros
//! (`log_op_start!`, `log_op_end!`, `log_op_error!`) are used by engine
//! commands only; core modules stick to `tracing::debug!` for detail such as
//! the selected action or a halted patch run.
//!
//! ```rust
//! use libris_core::logging_facility::{init, Profile};
//!
//! init(Profile::Test);
//! ```
//!
//! Tests install [`init_test_capture`] instead and assert on recorded events.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
