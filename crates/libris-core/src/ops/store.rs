use std::collections::BTreeMap;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use uuid::Uuid;

use crate::errors::{LibrisError, Result};
use crate::model::{Author, Book};
use crate::ops::repository::LibraryRepository;

#[derive(Debug, Default)]
struct StoreData {
    authors: BTreeMap<Uuid, Author>,
    books: BTreeMap<Uuid, Book>,
}

/// In-memory store shared by all request sessions
///
/// Cloning is cheap and every clone sees the same data. Commits take the
/// write lock once; reads take the read lock per call.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    data: Arc<RwLock<StoreData>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a unit of work
    pub fn session(&self) -> StoreSession {
        StoreSession {
            store: self.clone(),
            staged_authors: Vec::new(),
            staged_books: Vec::new(),
            expected_versions: BTreeMap::new(),
        }
    }

    /// Insert an author directly, bypassing sessions. Used for seeding.
    ///
    /// # Errors
    ///
    /// `Persistence` if the lock is poisoned.
    pub fn insert_author(&self, author: Author) -> Result<()> {
        self.write()?.authors.insert(author.id, author);
        Ok(())
    }

    /// Insert a book directly, bypassing sessions. Used for seeding.
    ///
    /// # Errors
    ///
    /// `Persistence` if the lock is poisoned or the owner is unknown.
    pub fn insert_book(&self, book: Book) -> Result<()> {
        let mut data = self.write()?;
        if !data.authors.contains_key(&book.author_id) {
            return Err(LibrisError::Persistence {
                message: format!("book {} references unknown author {}", book.id, book.author_id),
            });
        }
        data.books.insert(book.id, book);
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, StoreData>> {
        self.data.read().map_err(|_| LibrisError::Persistence {
            message: "store lock poisoned".to_string(),
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, StoreData>> {
        self.data.write().map_err(|_| LibrisError::Persistence {
            message: "store lock poisoned".to_string(),
        })
    }
}

/// One request's unit of work over an [`InMemoryStore`]
#[derive(Debug)]
pub struct StoreSession {
    store: InMemoryStore,
    staged_authors: Vec<Author>,
    staged_books: Vec<Book>,
    expected_versions: BTreeMap<Uuid, u64>,
}

impl StoreSession {
    /// True if something is staged and not yet persisted
    pub fn has_changes(&self) -> bool {
        !self.staged_authors.is_empty() || !self.staged_books.is_empty()
    }

    /// Read `author_id` as if it were at `version`, so that a later
    /// `persist` of a change to it fails with `ConcurrencyConflict` unless
    /// the stored author still has that version. Backs `If-Match`.
    pub fn expect_author_version(&mut self, author_id: Uuid, version: u64) {
        self.expected_versions.insert(author_id, version);
    }
}

impl LibraryRepository for StoreSession {
    fn get_author(&self, author_id: Uuid) -> Result<Option<Author>> {
        if let Some(staged) = self.staged_authors.iter().rev().find(|a| a.id == author_id) {
            return Ok(Some(staged.clone()));
        }
        let mut author = self.store.read()?.authors.get(&author_id).cloned();
        if let (Some(author), Some(&version)) =
            (author.as_mut(), self.expected_versions.get(&author_id))
        {
            author.version = version;
        }
        Ok(author)
    }

    fn list_authors(&self) -> Result<Vec<Author>> {
        let mut authors: BTreeMap<Uuid, Author> = self.store.read()?.authors.clone();
        for staged in &self.staged_authors {
            authors.insert(staged.id, staged.clone());
        }
        let mut authors: Vec<Author> = authors.into_values().collect();
        authors.sort_by(|a, b| {
            (&a.first_name, &a.last_name, a.id).cmp(&(&b.first_name, &b.last_name, b.id))
        });
        Ok(authors)
    }

    fn get_book(&self, author_id: Uuid, book_id: Uuid) -> Result<Option<Book>> {
        if let Some(staged) = self.staged_books.iter().find(|b| b.id == book_id) {
            return Ok((staged.author_id == author_id).then(|| staged.clone()));
        }
        Ok(self
            .store
            .read()?
            .books
            .get(&book_id)
            .filter(|b| b.author_id == author_id)
            .cloned())
    }

    fn list_books(&self, author_id: Uuid) -> Result<Vec<Book>> {
        let mut books: Vec<Book> = self
            .store
            .read()?
            .books
            .values()
            .filter(|b| b.author_id == author_id)
            .cloned()
            .collect();
        books.extend(
            self.staged_books
                .iter()
                .filter(|b| b.author_id == author_id)
                .cloned(),
        );
        books.sort_by(|a, b| (&a.title, a.id).cmp(&(&b.title, b.id)));
        Ok(books)
    }

    fn add_book(&mut self, book: Book) {
        self.staged_books.push(book);
    }

    fn update_author(&mut self, author: Author) {
        self.staged_authors.retain(|a| a.id != author.id);
        self.staged_authors.push(author);
    }

    fn persist(&mut self) -> Result<()> {
        if !self.has_changes() {
            return Ok(());
        }
        let mut data = self.store.write()?;

        // Check everything before touching anything
        for staged in &self.staged_authors {
            let current = data
                .authors
                .get(&staged.id)
                .ok_or_else(|| LibrisError::Persistence {
                    message: format!("author {} no longer exists", staged.id),
                })?;
            if current.version != staged.version {
                return Err(LibrisError::ConcurrencyConflict {
                    entity_id: staged.id.to_string(),
                    expected: staged.version,
                    actual: current.version,
                });
            }
        }
        for book in &self.staged_books {
            if data.books.contains_key(&book.id) {
                return Err(LibrisError::Persistence {
                    message: format!("book {} already exists", book.id),
                });
            }
            if !data.authors.contains_key(&book.author_id) {
                return Err(LibrisError::Persistence {
                    message: format!("book {} references unknown author {}", book.id, book.author_id),
                });
            }
        }

        for mut author in self.staged_authors.drain(..) {
            author.version += 1;
            data.authors.insert(author.id, author);
        }
        for book in self.staged_books.drain(..) {
            data.books.insert(book.id, book);
        }
        tracing::debug!("persisted staged changes");
        Ok(())
    }
}
