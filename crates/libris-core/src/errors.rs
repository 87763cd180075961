use libris_core_types::RequestId;
use thiserror::Error;

use crate::patch::PatchFailure;
use crate::rules::validation::ValidationErrors;

/// Result type alias using LibrisError
pub type Result<T> = std::result::Result<T, LibrisError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// Each kind maps to a stable error code used in response bodies, in logs
/// and by tests. The HTTP layer derives the status code from the kind alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Action selection
    RouteNotFound,
    NoMatchingVersion,
    UnsupportedMediaType,
    NotAcceptable,
    AmbiguousAction,

    // Startup registration
    /// Route template or media type in the registration table is unusable
    InvalidRegistration,

    // Resources
    ResourceNotFound,

    // Input
    /// Request could not be parsed into the expected shape (400)
    MalformedInput,
    /// A patch operation could not be applied (422)
    PatchApplicationFailed,
    /// Semantic validation rejected the representation (422)
    ValidationFailed,

    // Persistence
    ConcurrencyConflict,
    Persistence,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::RouteNotFound => "ERR_ROUTE_NOT_FOUND",
            ExErrorKind::NoMatchingVersion => "ERR_NO_MATCHING_VERSION",
            ExErrorKind::UnsupportedMediaType => "ERR_UNSUPPORTED_MEDIA_TYPE",
            ExErrorKind::NotAcceptable => "ERR_NOT_ACCEPTABLE",
            ExErrorKind::AmbiguousAction => "ERR_AMBIGUOUS_ACTION",
            ExErrorKind::InvalidRegistration => "ERR_INVALID_REGISTRATION",
            ExErrorKind::ResourceNotFound => "ERR_RESOURCE_NOT_FOUND",
            ExErrorKind::MalformedInput => "ERR_MALFORMED_INPUT",
            ExErrorKind::PatchApplicationFailed => "ERR_PATCH_APPLICATION_FAILED",
            ExErrorKind::ValidationFailed => "ERR_VALIDATION_FAILED",
            ExErrorKind::ConcurrencyConflict => "ERR_CONCURRENCY_CONFLICT",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// True for failures caused by the request rather than the service
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            ExErrorKind::AmbiguousAction
                | ExErrorKind::InvalidRegistration
                | ExErrorKind::Persistence
                | ExErrorKind::Internal
        )
    }

    /// PascalCase name used as the `kind` member of error bodies
    pub fn name(&self) -> &'static str {
        match self {
            ExErrorKind::RouteNotFound => "RouteNotFound",
            ExErrorKind::NoMatchingVersion => "NoMatchingVersion",
            ExErrorKind::UnsupportedMediaType => "UnsupportedMediaType",
            ExErrorKind::NotAcceptable => "NotAcceptable",
            ExErrorKind::AmbiguousAction => "AmbiguousAction",
            ExErrorKind::InvalidRegistration => "InvalidRegistration",
            ExErrorKind::ResourceNotFound => "ResourceNotFound",
            ExErrorKind::MalformedInput => "MalformedInput",
            ExErrorKind::PatchApplicationFailed => "PatchApplicationFailed",
            ExErrorKind::ValidationFailed => "ValidationFailed",
            ExErrorKind::ConcurrencyConflict => "ConcurrencyConflict",
            ExErrorKind::Persistence => "Persistence",
            ExErrorKind::Internal => "Internal",
        }
    }
}

/// Canonical structured error type
///
/// Carries the classification plus whatever detail the failure has:
/// the entity involved, the failing patch operation, the field error map or
/// the ambiguous candidates.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    entity_id: Option<String>,
    request_id: Option<RequestId>,
    message: String,
    patch_failure: Option<PatchFailure>,
    field_errors: Option<ValidationErrors>,
    candidates: Option<Vec<String>>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            entity_id: None,
            request_id: None,
            message: String::new(),
            patch_failure: None,
            field_errors: None,
            candidates: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add entity ID context
    pub fn with_entity_id(mut self, id: impl Into<String>) -> Self {
        self.entity_id = Some(id.into());
        self
    }

    /// Add request ID context
    pub fn with_request_id(mut self, request_id: RequestId) -> Self {
        self.request_id = Some(request_id);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Attach the failing patch operation
    pub fn with_patch_failure(mut self, failure: PatchFailure) -> Self {
        self.patch_failure = Some(failure);
        self
    }

    /// Attach the field path to messages mapping of a validation failure
    pub fn with_field_errors(mut self, errors: ValidationErrors) -> Self {
        self.field_errors = Some(errors);
        self
    }

    /// Attach the action names that could not be told apart
    pub fn with_candidates(mut self, candidates: Vec<String>) -> Self {
        self.candidates = Some(candidates);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the entity ID context, if any
    pub fn entity_id(&self) -> Option<&str> {
        self.entity_id.as_deref()
    }

    /// Get the request ID context, if any
    pub fn request_id(&self) -> Option<&RequestId> {
        self.request_id.as_ref()
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the failing patch operation, if any
    pub fn patch_failure(&self) -> Option<&PatchFailure> {
        self.patch_failure.as_ref()
    }

    /// Get the field error map, if any
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        self.field_errors.as_ref()
    }

    /// Get ambiguous candidates, if any
    pub fn candidates(&self) -> Option<&[String]> {
        self.candidates.as_deref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(entity_id) = &self.entity_id {
            write!(f, " (entity_id: {})", entity_id)?;
        }
        if let Some(failure) = &self.patch_failure {
            write!(f, " (operation {}: {})", failure.index, failure.reason)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {}

// ========== End Error Facility ==========

/// Error taxonomy for Libris operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LibrisError {
    // ===== Selection Errors =====
    /// No registered route template matches the method and path
    #[error("No route matches {method} {path}")]
    RouteNotFound { method: String, path: String },

    /// The route exists but no handler serves the resolved version
    #[error("No handler for API version {version} on {route}")]
    NoMatchingVersion { version: String, route: String },

    /// No handler consumes the request's Content-Type
    #[error("Unsupported media type: {content_type}")]
    UnsupportedMediaType { content_type: String },

    /// No handler produces anything the Accept header allows
    #[error("Not acceptable: {accept}")]
    NotAcceptable { accept: String },

    /// More than one handler remains after the specificity tie-break
    #[error("Ambiguous action on {route}: {candidates:?}")]
    AmbiguousAction {
        route: String,
        candidates: Vec<String>,
    },

    // ===== Registration Errors =====
    /// Two descriptors in one route group accept the same version and media types
    #[error("Conflicting registration on {route}: {first} overlaps {second}")]
    ConflictingRegistration {
        route: String,
        first: String,
        second: String,
    },

    /// Route template could not be parsed
    #[error("Invalid route template '{template}': {reason}")]
    InvalidRouteTemplate { template: String, reason: String },

    /// Media type in a registration could not be parsed
    #[error("Invalid media type '{value}' in registration of {action}")]
    InvalidMediaType { action: String, value: String },

    /// The same action key was registered twice
    #[error("Action registered twice: {action}")]
    DuplicateAction { action: String },

    // ===== Resource Errors =====
    /// Author does not exist
    #[error("Author not found: {author_id}")]
    AuthorNotFound { author_id: String },

    /// Book does not exist for the given author
    #[error("Book {book_id} not found for author {author_id}")]
    BookNotFound { author_id: String, book_id: String },

    // ===== Input Errors =====
    /// Request input could not be parsed
    #[error("Malformed input: {reason}")]
    MalformedInput {
        field: Option<String>,
        reason: String,
    },

    /// A patch operation failed; nothing was persisted
    #[error("Patch failed: {0}")]
    PatchFailed(PatchFailure),

    /// Semantic validation failed
    #[error("Validation failed for {} field(s)", errors.len())]
    ValidationFailed { errors: ValidationErrors },

    // ===== Persistence Errors =====
    /// Entity was modified by someone else between fetch and persist
    #[error("Concurrent modification of {entity_id}: expected version {expected}, found {actual}")]
    ConcurrencyConflict {
        entity_id: String,
        expected: u64,
        actual: u64,
    },

    /// Repository failed to persist staged changes
    #[error("Persistence error: {message}")]
    Persistence { message: String },

    // ===== Generic Errors =====
    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl LibrisError {
    /// Shorthand for a malformed input tied to one field
    pub fn malformed_field(field: impl Into<String>, reason: impl Into<String>) -> Self {
        LibrisError::MalformedInput {
            field: Some(field.into()),
            reason: reason.into(),
        }
    }
}

/// Conversion from LibrisError to ExError
impl From<LibrisError> for ExError {
    fn from(err: LibrisError) -> Self {
        let message = err.to_string();
        match err {
            LibrisError::RouteNotFound { path, .. } => ExError::new(ExErrorKind::RouteNotFound)
                .with_entity_id(path)
                .with_message(message),
            LibrisError::NoMatchingVersion { .. } => {
                ExError::new(ExErrorKind::NoMatchingVersion).with_message(message)
            }
            LibrisError::UnsupportedMediaType { .. } => {
                ExError::new(ExErrorKind::UnsupportedMediaType).with_message(message)
            }
            LibrisError::NotAcceptable { .. } => {
                ExError::new(ExErrorKind::NotAcceptable).with_message(message)
            }
            LibrisError::AmbiguousAction { candidates, .. } => {
                ExError::new(ExErrorKind::AmbiguousAction)
                    .with_message(message)
                    .with_candidates(candidates)
            }
            LibrisError::ConflictingRegistration { first, second, .. } => {
                ExError::new(ExErrorKind::AmbiguousAction)
                    .with_op("register")
                    .with_message(message)
                    .with_candidates(vec![first, second])
            }
            LibrisError::InvalidRouteTemplate { .. } => ExError::new(ExErrorKind::InvalidRegistration)
                .with_op("register")
                .with_message(message),
            LibrisError::InvalidMediaType { action, .. } => {
                ExError::new(ExErrorKind::InvalidRegistration)
                    .with_op("register")
                    .with_entity_id(action)
                    .with_message(message)
            }
            LibrisError::DuplicateAction { action } => {
                ExError::new(ExErrorKind::InvalidRegistration)
                    .with_op("register")
                    .with_entity_id(action)
                    .with_message(message)
            }
            LibrisError::AuthorNotFound { author_id } => {
                ExError::new(ExErrorKind::ResourceNotFound)
                    .with_entity_id(author_id)
                    .with_message("Author not found")
            }
            LibrisError::BookNotFound { book_id, .. } => {
                ExError::new(ExErrorKind::ResourceNotFound)
                    .with_entity_id(book_id)
                    .with_message("Book not found")
            }
            LibrisError::MalformedInput { field, reason } => {
                let err = ExError::new(ExErrorKind::MalformedInput).with_message(reason.clone());
                match field {
                    Some(field) => {
                        let mut errors = ValidationErrors::new();
                        errors.insert(field, vec![reason]);
                        err.with_field_errors(errors)
                    }
                    None => err,
                }
            }
            LibrisError::PatchFailed(failure) => ExError::new(ExErrorKind::PatchApplicationFailed)
                .with_message(message)
                .with_patch_failure(failure),
            LibrisError::ValidationFailed { errors } => ExError::new(ExErrorKind::ValidationFailed)
                .with_message(message)
                .with_field_errors(errors),
            LibrisError::ConcurrencyConflict { entity_id, .. } => {
                ExError::new(ExErrorKind::ConcurrencyConflict)
                    .with_entity_id(entity_id)
                    .with_message(message)
            }
            LibrisError::Persistence { .. } => ExError::new(ExErrorKind::Persistence)
                .with_op("persist")
                .with_message(message),
            LibrisError::Internal { .. } => ExError::new(ExErrorKind::Internal).with_message(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::patch::{PatchFailureReason, PatchOpKind};

    #[test]
    fn test_codes_are_unique() {
        let kinds = [
            ExErrorKind::RouteNotFound,
            ExErrorKind::NoMatchingVersion,
            ExErrorKind::UnsupportedMediaType,
            ExErrorKind::NotAcceptable,
            ExErrorKind::AmbiguousAction,
            ExErrorKind::InvalidRegistration,
            ExErrorKind::ResourceNotFound,
            ExErrorKind::MalformedInput,
            ExErrorKind::PatchApplicationFailed,
            ExErrorKind::ValidationFailed,
            ExErrorKind::ConcurrencyConflict,
            ExErrorKind::Persistence,
            ExErrorKind::Internal,
        ];
        let mut codes: Vec<&str> = kinds.iter().map(|k| k.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), kinds.len());
    }

    #[test]
    fn test_patch_failure_carries_index() {
        let err = LibrisError::PatchFailed(PatchFailure {
            index: 1,
            op: PatchOpKind::Remove,
            path: "/nonexistent".to_string(),
            reason: PatchFailureReason::PathNotFound,
        });
        let ex: ExError = err.into();
        assert_eq!(ex.kind(), ExErrorKind::PatchApplicationFailed);
        assert_eq!(ex.patch_failure().map(|f| f.index), Some(1));
        assert!(ex.to_string().contains("operation 1"));
    }

    #[test]
    fn test_malformed_field_becomes_field_error() {
        let ex: ExError = LibrisError::malformed_field("authorId", "not a valid id").into();
        assert_eq!(ex.kind(), ExErrorKind::MalformedInput);
        let errors = ex.field_errors().unwrap();
        assert_eq!(errors["authorId"], vec!["not a valid id".to_string()]);
    }

    #[test]
    fn test_client_errors() {
        assert!(ExErrorKind::ResourceNotFound.is_client_error());
        assert!(ExErrorKind::ConcurrencyConflict.is_client_error());
        assert!(!ExErrorKind::AmbiguousAction.is_client_error());
        assert!(!ExErrorKind::Persistence.is_client_error());
    }
}
