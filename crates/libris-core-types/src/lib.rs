//! Core types shared across Libris facilities
//!
//! This crate provides foundational types used by the error facility,
//! the logging facility and the HTTP surface:
//!
//! - **Correlation types**: RequestId, TraceId, RequestContext
//! - **Schema constants**: Canonical field keys, event names and header names

pub mod correlation;
pub mod schema;

pub use correlation::{RequestContext, RequestId, TraceId};
