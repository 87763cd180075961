//! Book command handlers with boundary logging.

#![allow(clippy::result_large_err)]

use libris_core::errors::{LibrisError, Result};
use libris_core::model::Author;
use libris_core::ops::LibraryRepository;
use libris_core::representation::{
    book_input_from_representation, book_to_representation, BookInputKind, BookKind,
};
use libris_core::rules::{BookForCreationValidator, Validator};
use libris_core::{log_op_end, log_op_error, log_op_start};
use serde_json::Value;
use uuid::Uuid;

use super::{check, parse_body, parse_id};

/// A book that was just persisted
#[derive(Debug, Clone, PartialEq)]
pub struct CreatedBook {
    pub author_id: Uuid,
    pub book_id: Uuid,
    /// The new book in the `Book` shape
    pub representation: Value,
}

/// List an author's books in the `Book` shape
///
/// # Errors
///
/// - `MalformedInput`: `author_id` is not an id
/// - `AuthorNotFound`: No such author
/// - `Persistence`: Repository read failed
pub fn list_books<R: LibraryRepository>(repo: &R, author_id: &str) -> Result<Vec<Value>> {
    log_op_start!("list_books", author_id = author_id);
    let start = std::time::Instant::now();

    let result = list_books_impl(repo, author_id).map_err(|e| {
        log_op_error!(
            "list_books",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "list_books",
        duration_ms = start.elapsed().as_millis() as u64,
        count = result.len()
    );
    Ok(result)
}

fn list_books_impl<R: LibraryRepository>(repo: &R, author_id: &str) -> Result<Vec<Value>> {
    let author = require_author(repo, author_id)?;
    Ok(repo
        .list_books(author.id)?
        .iter()
        .map(|b| book_to_representation(b, &author, BookKind::Book))
        .collect())
}

/// Fetch one book of an author in the requested shape
///
/// # Errors
///
/// - `MalformedInput`: An id is not an id
/// - `AuthorNotFound` / `BookNotFound`: No such author, or no such book for it
/// - `Persistence`: Repository read failed
pub fn get_book<R: LibraryRepository>(
    repo: &R,
    author_id: &str,
    book_id: &str,
    kind: BookKind,
) -> Result<Value> {
    log_op_start!("get_book", author_id = author_id, book_id = book_id);
    let start = std::time::Instant::now();

    let result = get_book_impl(repo, author_id, book_id, kind).map_err(|e| {
        log_op_error!(
            "get_book",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "get_book",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok(result)
}

fn get_book_impl<R: LibraryRepository>(
    repo: &R,
    author_id: &str,
    book_id: &str,
    kind: BookKind,
) -> Result<Value> {
    let author = require_author(repo, author_id)?;
    let book_id = parse_id("bookId", book_id)?;
    let book = repo
        .get_book(author.id, book_id)?
        .ok_or_else(|| LibrisError::BookNotFound {
            author_id: author.id.to_string(),
            book_id: book_id.to_string(),
        })?;
    Ok(book_to_representation(&book, &author, kind))
}

/// Create a book for an author from one of the creation shapes
///
/// # Errors
///
/// - `MalformedInput`: Bad id, unparseable body or a member of the wrong type
/// - `ValidationFailed`: Title/description/page rules, or a body `authorId`
///   naming another author
/// - `AuthorNotFound`: No such author
/// - `Persistence`: Commit failed
pub fn create_book<R: LibraryRepository>(
    repo: &mut R,
    author_id: &str,
    body: &[u8],
    kind: BookInputKind,
) -> Result<CreatedBook> {
    log_op_start!("create_book", author_id = author_id, input = ?kind);
    let start = std::time::Instant::now();

    let result = create_book_impl(repo, author_id, body, kind).map_err(|e| {
        log_op_error!(
            "create_book",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "create_book",
        duration_ms = start.elapsed().as_millis() as u64,
        book_id = %result.book_id
    );
    Ok(result)
}

fn create_book_impl<R: LibraryRepository>(
    repo: &mut R,
    author_id: &str,
    body: &[u8],
    kind: BookInputKind,
) -> Result<CreatedBook> {
    let id = parse_id("authorId", author_id)?;
    let representation = parse_body(body)?;
    let input = book_input_from_representation(&representation, kind)?;
    let validator = BookForCreationValidator {
        route_author_id: id,
        require_pages: kind == BookInputKind::BookForCreationWithAmountOfPages,
    };
    check(validator.validate(&representation))?;

    let author = repo.get_author(id)?.ok_or_else(|| LibrisError::AuthorNotFound {
        author_id: id.to_string(),
    })?;

    let book = input.book.into_book(author.id);
    let book_id = book.id;
    let representation = book_to_representation(&book, &author, BookKind::Book);
    repo.add_book(book);
    repo.persist()?;

    Ok(CreatedBook {
        author_id: author.id,
        book_id,
        representation,
    })
}

fn require_author<R: LibraryRepository>(repo: &R, author_id: &str) -> Result<Author> {
    let id = parse_id("authorId", author_id)?;
    repo.get_author(id)?.ok_or_else(|| LibrisError::AuthorNotFound {
        author_id: id.to_string(),
    })
}
