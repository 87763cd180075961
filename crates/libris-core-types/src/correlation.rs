//! Correlation types for request tracking and tracing
//!
//! Every HTTP request gets a `RequestId`; callers may also forward a
//! `TraceId` that is carried through logs unchanged.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Longest caller-supplied correlation value we are willing to echo back.
const MAX_FORWARDED_LEN: usize = 128;

/// Unique identifier for a single request
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(String);

impl RequestId {
    /// Generate a new time-ordered RequestId using UUIDv7
    pub fn new() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Reuse a caller-supplied id if it is printable and reasonably short,
    /// otherwise generate a fresh one.
    pub fn from_forwarded(value: Option<&str>) -> Self {
        match value.and_then(sanitize_forwarded) {
            Some(v) => Self(v),
            None => Self::new(),
        }
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trace identifier forwarded by an upstream caller
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TraceId(String);

impl TraceId {
    /// Accept a forwarded trace id; rejects empty, oversized or
    /// non-printable values.
    pub fn parse(value: &str) -> Option<Self> {
        sanitize_forwarded(value).map(Self)
    }

    /// Get the string representation
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TraceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

fn sanitize_forwarded(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty()
        || trimmed.len() > MAX_FORWARDED_LEN
        || !trimmed.chars().all(|c| c.is_ascii_graphic())
    {
        return None;
    }
    Some(trimmed.to_string())
}

/// Correlation context carried through a request
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub request_id: RequestId,
    pub trace_id: Option<TraceId>,
}

impl RequestContext {
    /// Create a new context with a fresh RequestId
    pub fn new() -> Self {
        Self {
            request_id: RequestId::new(),
            trace_id: None,
        }
    }

    /// Build a context from the raw correlation header values of a request
    pub fn from_headers(request_id: Option<&str>, trace_id: Option<&str>) -> Self {
        Self {
            request_id: RequestId::from_forwarded(request_id),
            trace_id: trace_id.and_then(TraceId::parse),
        }
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::new()
    }
}
