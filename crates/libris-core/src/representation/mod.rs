//! Conversion between persisted entities and their external JSON shapes.
//!
//! Output shapes are built with `serde_json::json!`. Input shapes are read
//! field by field: member names match ASCII case-insensitively, a missing or
//! `null` member is absent, and a member of the wrong JSON type is a
//! structural failure naming that member. Presence and length rules belong
//! to the validators in [`crate::rules`].

use serde_json::{json, Map, Value};
use uuid::Uuid;

use crate::errors::{LibrisError, Result};
use crate::model::{Author, AuthorUpdate, Book, NewBook};

/// Author shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthorKind {
    /// `{id, firstName, lastName}`
    Author,
    /// `{firstName, lastName}`, the PUT/PATCH input shape
    AuthorForUpdate,
}

/// Book output shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookKind {
    /// `{id, authorId, authorFirstName, authorLastName, title, description}`
    Book,
    /// `{id, authorId, author, title, description}` with `author` as "First Last"
    BookWithConcatenatedAuthorName,
}

/// Book input shapes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookInputKind {
    /// `{authorId?, title, description}`
    BookForCreation,
    /// `BookForCreation` plus `amountOfPages`
    BookForCreationWithAmountOfPages,
}

/// A parsed book creation body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookInput {
    /// Author named in the body, if any
    pub author_id: Option<Uuid>,
    pub book: NewBook,
}

/// Non-null member `name` of an object representation, exact name first
pub fn field<'v>(representation: &'v Value, name: &str) -> Option<&'v Value> {
    member(representation.as_object()?, name)
}

pub fn author_to_representation(author: &Author, kind: AuthorKind) -> Value {
    match kind {
        AuthorKind::Author => json!({
            "id": author.id,
            "firstName": author.first_name,
            "lastName": author.last_name,
        }),
        AuthorKind::AuthorForUpdate => json!({
            "firstName": author.first_name,
            "lastName": author.last_name,
        }),
    }
}

/// Read the name fields of an author shape. Absent names become empty
/// strings; the validator reports them.
///
/// # Errors
///
/// `MalformedInput` if the value is not an object or a name is not a string.
pub fn author_from_representation(representation: &Value, kind: AuthorKind) -> Result<AuthorUpdate> {
    let map = object(representation)?;
    if kind == AuthorKind::Author {
        optional_uuid(map, "id")?;
    }
    Ok(AuthorUpdate {
        first_name: optional_string(map, "firstName")?.unwrap_or_default(),
        last_name: optional_string(map, "lastName")?.unwrap_or_default(),
    })
}

/// Render a book. `author` must be the book's owner.
pub fn book_to_representation(book: &Book, author: &Author, kind: BookKind) -> Value {
    match kind {
        BookKind::Book => json!({
            "id": book.id,
            "authorId": book.author_id,
            "authorFirstName": author.first_name,
            "authorLastName": author.last_name,
            "title": book.title,
            "description": book.description,
        }),
        BookKind::BookWithConcatenatedAuthorName => json!({
            "id": book.id,
            "authorId": book.author_id,
            "author": author.full_name(),
            "title": book.title,
            "description": book.description,
        }),
    }
}

/// Read a book creation body.
///
/// # Errors
///
/// `MalformedInput` naming the first member with the wrong JSON type.
pub fn book_input_from_representation(representation: &Value, kind: BookInputKind) -> Result<BookInput> {
    let map = object(representation)?;
    let author_id = optional_uuid(map, "authorId")?;
    let title = optional_string(map, "title")?.unwrap_or_default();
    let description = optional_string(map, "description")?;
    let amount_of_pages = match kind {
        BookInputKind::BookForCreation => None,
        BookInputKind::BookForCreationWithAmountOfPages => optional_i32(map, "amountOfPages")?,
    };
    Ok(BookInput {
        author_id,
        book: NewBook {
            title,
            description,
            amount_of_pages,
        },
    })
}

fn object(representation: &Value) -> Result<&Map<String, Value>> {
    representation
        .as_object()
        .ok_or_else(|| LibrisError::MalformedInput {
            field: None,
            reason: "expected a JSON object".to_string(),
        })
}

fn member<'v>(map: &'v Map<String, Value>, name: &str) -> Option<&'v Value> {
    map.get(name)
        .or_else(|| {
            map.iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(name))
                .map(|(_, v)| v)
        })
        .filter(|v| !v.is_null())
}

fn optional_string(map: &Map<String, Value>, name: &str) -> Result<Option<String>> {
    match member(map, name) {
        None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(LibrisError::malformed_field(name, "expected a string")),
    }
}

fn optional_i32(map: &Map<String, Value>, name: &str) -> Result<Option<i32>> {
    match member(map, name) {
        None => Ok(None),
        Some(v) => v
            .as_i64()
            .and_then(|n| i32::try_from(n).ok())
            .map(Some)
            .ok_or_else(|| LibrisError::malformed_field(name, "expected a 32-bit integer")),
    }
}

fn optional_uuid(map: &Map<String, Value>, name: &str) -> Result<Option<Uuid>> {
    match member(map, name) {
        None => Ok(None),
        Some(Value::String(s)) => Uuid::parse_str(s)
            .map(Some)
            .map_err(|_| LibrisError::malformed_field(name, format!("'{}' is not a valid id", s))),
        Some(_) => Err(LibrisError::malformed_field(name, "expected an id string")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn author() -> Author {
        Author::new("George", "Martin")
    }

    #[test]
    fn test_author_shapes() {
        let a = author();
        let rep = author_to_representation(&a, AuthorKind::Author);
        assert_eq!(rep["id"], json!(a.id.to_string()));
        assert_eq!(rep["firstName"], "George");

        let update = author_to_representation(&a, AuthorKind::AuthorForUpdate);
        assert!(update.get("id").is_none());
        assert_eq!(update["lastName"], "Martin");
    }

    #[test]
    fn test_concatenated_shape_has_author_field() {
        let a = author();
        let book = NewBook {
            title: "A Game of Thrones".to_string(),
            description: Some("First book".to_string()),
            amount_of_pages: None,
        }
        .into_book(a.id);

        let base = book_to_representation(&book, &a, BookKind::Book);
        assert!(base.get("author").is_none());
        assert_eq!(base["authorFirstName"], "George");

        let concat = book_to_representation(&book, &a, BookKind::BookWithConcatenatedAuthorName);
        assert_eq!(concat["author"], "George Martin");
        assert!(concat.get("authorFirstName").is_none());
    }

    #[test]
    fn test_author_input_case_insensitive_and_missing() {
        let update =
            author_from_representation(&json!({"FIRSTNAME": "Ann"}), AuthorKind::AuthorForUpdate)
                .unwrap();
        assert_eq!(update.first_name, "Ann");
        assert_eq!(update.last_name, "");
    }

    #[test]
    fn test_structural_failures_name_the_field() {
        let err = author_from_representation(&json!({"firstName": 5}), AuthorKind::AuthorForUpdate)
            .unwrap_err();
        assert_eq!(
            err,
            LibrisError::malformed_field("firstName", "expected a string")
        );

        let err = book_input_from_representation(
            &json!({"title": "T", "amountOfPages": "many"}),
            BookInputKind::BookForCreationWithAmountOfPages,
        )
        .unwrap_err();
        assert!(matches!(err, LibrisError::MalformedInput { field: Some(f), .. } if f == "amountOfPages"));

        assert!(author_from_representation(&json!([1]), AuthorKind::AuthorForUpdate).is_err());
    }

    #[test]
    fn test_book_input_kinds() {
        let body = json!({"title": "T", "description": null, "amountOfPages": 120});
        let plain = book_input_from_representation(&body, BookInputKind::BookForCreation).unwrap();
        assert_eq!(plain.book.amount_of_pages, None);
        assert_eq!(plain.book.description, None);

        let pages =
            book_input_from_representation(&body, BookInputKind::BookForCreationWithAmountOfPages)
                .unwrap();
        assert_eq!(pages.book.amount_of_pages, Some(120));
    }
}
