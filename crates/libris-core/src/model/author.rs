use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum length of each name part
pub const MAX_NAME_LENGTH: usize = 150;

/// Author - a persisted author entity
///
/// Distinct from its external representations; see
/// [`crate::representation`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Unique identifier
    pub id: Uuid,

    pub first_name: String,

    pub last_name: String,

    /// Optimistic concurrency token, bumped on every persisted change
    pub version: u64,
}

impl Author {
    /// Create a new, never persisted author with a fresh id
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), first_name, last_name)
    }

    pub fn with_id(id: Uuid, first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            id,
            first_name: first_name.into(),
            last_name: last_name.into(),
            version: 0,
        }
    }

    /// "First Last"
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// Changes an update applies to an author
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorUpdate {
    pub first_name: String,
    pub last_name: String,
}

impl AuthorUpdate {
    /// Overwrite the mutable fields of `author`
    pub fn apply_to(self, author: &mut Author) {
        author.first_name = self.first_name;
        author.last_name = self.last_name;
    }
}
