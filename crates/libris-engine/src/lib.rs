//! Libris Engine - Orchestration layer
//!
//! One command per HTTP action. Commands parse request input, drive the
//! repository, representation mapper, patch engine and validators, and own
//! the `start`/`end`/`end_error` lifecycle events.

pub mod commands;
