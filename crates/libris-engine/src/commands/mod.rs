//! Command orchestration layer.
//!
//! ## Logging Ownership
//!
//! - `log_op_start!` at entry
//! - `log_op_end!` on success
//! - `log_op_error!` on failure
//!
//! Core modules below use only `tracing::debug!()`.

pub mod authors;
pub mod books;

use libris_core::errors::{LibrisError, Result};
use serde_json::Value;
use uuid::Uuid;

/// Parse a route id parameter
pub(crate) fn parse_id(field: &str, raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|_| LibrisError::malformed_field(field, format!("'{}' is not a valid id", raw)))
}

/// Parse a JSON request body
pub(crate) fn parse_body(body: &[u8]) -> Result<Value> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(LibrisError::MalformedInput {
            field: None,
            reason: "request body is required".to_string(),
        });
    }
    serde_json::from_slice(body).map_err(|e| LibrisError::MalformedInput {
        field: None,
        reason: format!("request body is not valid JSON: {}", e),
    })
}

/// Semantic validation result as an error
pub(crate) fn check(errors: libris_core::rules::ValidationErrors) -> Result<()> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(LibrisError::ValidationFailed { errors })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_id() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id("authorId", &id.to_string()).unwrap(), id);
        assert!(matches!(
            parse_id("authorId", "42"),
            Err(LibrisError::MalformedInput { field: Some(f), .. }) if f == "authorId"
        ));
    }

    #[test]
    fn test_parse_body() {
        assert!(parse_body(b"{\"a\": 1}").is_ok());
        assert!(parse_body(b"  ").is_err());
        assert!(parse_body(b"{").is_err());
    }
}
