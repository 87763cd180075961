use uuid::Uuid;

use crate::errors::Result;
use crate::model::{Author, Book};

/// Unit-of-work access to authors and books
///
/// One value per request. `add_book` and `update_author` only stage
/// changes; nothing is visible to other sessions until `persist` succeeds.
/// Reads within the session see its own staged changes.
pub trait LibraryRepository {
    /// Fetch an author, `None` if unknown
    ///
    /// # Errors
    ///
    /// `Persistence` if the backing store cannot be read.
    fn get_author(&self, author_id: Uuid) -> Result<Option<Author>>;

    /// All authors, ordered by first then last name
    ///
    /// # Errors
    ///
    /// `Persistence` if the backing store cannot be read.
    fn list_authors(&self) -> Result<Vec<Author>>;

    /// # Errors
    ///
    /// `Persistence` if the backing store cannot be read.
    fn author_exists(&self, author_id: Uuid) -> Result<bool> {
        Ok(self.get_author(author_id)?.is_some())
    }

    /// Fetch a book of one author, `None` if unknown or owned by someone else
    ///
    /// # Errors
    ///
    /// `Persistence` if the backing store cannot be read.
    fn get_book(&self, author_id: Uuid, book_id: Uuid) -> Result<Option<Book>>;

    /// Books of one author, ordered by title
    ///
    /// # Errors
    ///
    /// `Persistence` if the backing store cannot be read.
    fn list_books(&self, author_id: Uuid) -> Result<Vec<Book>>;

    /// Stage a new book
    fn add_book(&mut self, book: Book);

    /// Stage a changed author. Its `version` must be the one it was read with.
    fn update_author(&mut self, author: Author);

    /// Commit everything staged, all or nothing
    ///
    /// # Errors
    ///
    /// - `ConcurrencyConflict` if a staged author changed since it was read
    /// - `Persistence` if the commit cannot be applied
    fn persist(&mut self) -> Result<()>;
}
