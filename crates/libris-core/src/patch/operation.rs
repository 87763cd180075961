//! Patch operations and the failure they report.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::{LibrisError, Result};

/// One JSON Patch operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum PatchOperation {
    Add { path: String, value: Value },
    Remove { path: String },
    Replace { path: String, value: Value },
    Move { from: String, path: String },
    Copy { from: String, path: String },
    Test { path: String, value: Value },
}

impl PatchOperation {
    pub fn kind(&self) -> PatchOpKind {
        match self {
            PatchOperation::Add { .. } => PatchOpKind::Add,
            PatchOperation::Remove { .. } => PatchOpKind::Remove,
            PatchOperation::Replace { .. } => PatchOpKind::Replace,
            PatchOperation::Move { .. } => PatchOpKind::Move,
            PatchOperation::Copy { .. } => PatchOpKind::Copy,
            PatchOperation::Test { .. } => PatchOpKind::Test,
        }
    }

    /// Target pointer
    pub fn path(&self) -> &str {
        match self {
            PatchOperation::Add { path, .. }
            | PatchOperation::Remove { path }
            | PatchOperation::Replace { path, .. }
            | PatchOperation::Move { path, .. }
            | PatchOperation::Copy { path, .. }
            | PatchOperation::Test { path, .. } => path,
        }
    }
}

/// Operation name without its operands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchOpKind {
    Add,
    Remove,
    Replace,
    Move,
    Copy,
    Test,
}

impl PatchOpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            PatchOpKind::Add => "add",
            PatchOpKind::Remove => "remove",
            PatchOpKind::Replace => "replace",
            PatchOpKind::Move => "move",
            PatchOpKind::Copy => "copy",
            PatchOpKind::Test => "test",
        }
    }
}

impl fmt::Display for PatchOpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an operation could not be applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatchFailureReason {
    /// Target (or `from` source) does not exist
    PathNotFound,
    /// Pointer is malformed, its parent is missing, or an index is out of range
    InvalidPath,
    /// `test` found a different value
    TestFailed,
}

impl PatchFailureReason {
    /// PascalCase name used in error bodies
    pub fn name(&self) -> &'static str {
        match self {
            PatchFailureReason::PathNotFound => "PathNotFound",
            PatchFailureReason::InvalidPath => "InvalidPath",
            PatchFailureReason::TestFailed => "TestFailed",
        }
    }
}

impl fmt::Display for PatchFailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatchFailureReason::PathNotFound => f.write_str("path not found"),
            PatchFailureReason::InvalidPath => f.write_str("invalid path"),
            PatchFailureReason::TestFailed => f.write_str("test failed"),
        }
    }
}

/// The operation a patch run halted on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchFailure {
    /// Zero-based position in the document
    pub index: usize,
    pub op: PatchOpKind,
    /// The pointer that failed; the `from` pointer when the source is missing
    pub path: String,
    pub reason: PatchFailureReason,
}

impl fmt::Display for PatchFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "operation {} ({} {}): {}",
            self.index, self.op, self.path, self.reason
        )
    }
}

/// An ordered list of operations as received in a request body.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PatchDocument {
    pub operations: Vec<PatchOperation>,
}

impl PatchDocument {
    pub fn new(operations: Vec<PatchOperation>) -> Self {
        Self { operations }
    }

    /// Parse a request body.
    ///
    /// # Errors
    ///
    /// `MalformedInput` if the body is not a JSON array of operations. The
    /// reason names the offending element.
    pub fn from_slice(body: &[u8]) -> Result<Self> {
        let value: Value = serde_json::from_slice(body).map_err(|e| LibrisError::MalformedInput {
            field: None,
            reason: format!("patch document is not valid JSON: {}", e),
        })?;
        let items = match value {
            Value::Array(items) => items,
            _ => {
                return Err(LibrisError::MalformedInput {
                    field: None,
                    reason: "patch document must be a JSON array".to_string(),
                })
            }
        };

        let operations = items
            .into_iter()
            .enumerate()
            .map(|(i, item)| {
                serde_json::from_value(item).map_err(|e| {
                    LibrisError::malformed_field(format!("[{}]", i), format!("invalid operation: {}", e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { operations })
    }

    pub fn len(&self) -> usize {
        self.operations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_document() {
        let body = br#"[
            {"op": "replace", "path": "/firstName", "value": "Ann"},
            {"op": "move", "from": "/a", "path": "/b"},
            {"op": "remove", "path": "/c"}
        ]"#;
        let doc = PatchDocument::from_slice(body).unwrap();
        assert_eq!(doc.len(), 3);
        assert_eq!(
            doc.operations[0],
            PatchOperation::Replace {
                path: "/firstName".to_string(),
                value: json!("Ann")
            }
        );
        assert_eq!(doc.operations[1].kind(), PatchOpKind::Move);
        assert_eq!(doc.operations[1].path(), "/b");
    }

    #[test]
    fn test_parse_rejects_unknown_op_with_index() {
        let body = br#"[{"op": "remove", "path": "/a"}, {"op": "frobnicate", "path": "/b"}]"#;
        match PatchDocument::from_slice(body).unwrap_err() {
            LibrisError::MalformedInput { field, .. } => assert_eq!(field.as_deref(), Some("[1]")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(PatchDocument::from_slice(br#"{"op": "remove"}"#).is_err());
        assert!(PatchDocument::from_slice(b"not json").is_err());
    }

    #[test]
    fn test_failure_display() {
        let failure = PatchFailure {
            index: 1,
            op: PatchOpKind::Remove,
            path: "/nonexistent".to_string(),
            reason: PatchFailureReason::PathNotFound,
        };
        assert_eq!(
            failure.to_string(),
            "operation 1 (remove /nonexistent): path not found"
        );
    }
}
