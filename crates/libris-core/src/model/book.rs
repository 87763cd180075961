use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum title length
pub const MAX_TITLE_LENGTH: usize = 150;

/// Maximum description length
pub const MAX_DESCRIPTION_LENGTH: usize = 2500;

/// Book - a persisted book, always owned by exactly one author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: Uuid,

    /// Owning author
    pub author_id: Uuid,

    pub title: String,

    pub description: Option<String>,

    /// Only set when created through the page-count input shape
    pub amount_of_pages: Option<i32>,

    /// Optimistic concurrency token
    pub version: u64,
}

/// Fields needed to create a book. The id is assigned on creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub description: Option<String>,
    pub amount_of_pages: Option<i32>,
}

impl NewBook {
    /// Build the entity for `author_id` with a fresh id
    pub fn into_book(self, author_id: Uuid) -> Book {
        Book {
            id: Uuid::new_v4(),
            author_id,
            title: self.title,
            description: self.description,
            amount_of_pages: self.amount_of_pages,
            version: 0,
        }
    }
}
