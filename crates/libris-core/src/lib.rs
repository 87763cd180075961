//! Libris Core - action resolution and partial-update kernel
//!
//! This crate provides the pieces the HTTP surface is assembled from:
//! - Media type parsing and header matching
//! - API versions and version resolution
//! - The route table and the media-type driven action selector
//! - The JSON Patch engine with validate-after-apply
//! - Author/book entities, their representations and validators
//! - The repository trait and an in-memory unit-of-work implementation

pub mod errors;
pub mod logging_facility;
pub mod media_type;
pub mod model;
pub mod ops;
pub mod patch;
pub mod representation;
pub mod routing;
pub mod rules;
pub mod version;

// Re-export commonly used types
pub use errors::{ExError, ExErrorKind, LibrisError, Result};
pub use media_type::MediaType;
pub use model::{Author, Book};
pub use ops::{InMemoryStore, LibraryRepository};
pub use routing::{ActionSelector, HttpMethod, Registration, Selection, SelectionRequest, SelectorOptions};
pub use version::{ApiVersion, VersionMatching, VersionSet, VersionSource};
