//! Author command handlers with boundary logging.
//!
//! - List and fetch authors
//! - Full update (PUT) from the `AuthorForUpdate` shape
//! - Partial update (PATCH) through the patch engine

#![allow(clippy::result_large_err)]

use libris_core::errors::{LibrisError, Result};
use libris_core::ops::LibraryRepository;
use libris_core::patch::{self, PatchDocument};
use libris_core::representation::{
    author_from_representation, author_to_representation, AuthorKind,
};
use libris_core::rules::{AuthorForUpdateValidator, Validator};
use libris_core::{log_op_end, log_op_error, log_op_start};
use serde_json::Value;
use uuid::Uuid;

use super::{check, parse_body, parse_id};

/// List all authors in the `Author` shape
///
/// # Errors
///
/// - `Persistence`: Repository read failed
pub fn list_authors<R: LibraryRepository>(repo: &R) -> Result<Vec<Value>> {
    log_op_start!("list_authors");
    let start = std::time::Instant::now();

    let result = repo
        .list_authors()
        .map(|authors| {
            authors
                .iter()
                .map(|a| author_to_representation(a, AuthorKind::Author))
                .collect::<Vec<_>>()
        })
        .map_err(|e| {
            log_op_error!(
                "list_authors",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            );
            e
        })?;

    log_op_end!(
        "list_authors",
        duration_ms = start.elapsed().as_millis() as u64,
        count = result.len()
    );
    Ok(result)
}

/// Fetch one author in the `Author` shape
///
/// # Errors
///
/// - `MalformedInput`: `author_id` is not an id
/// - `AuthorNotFound`: No such author
/// - `Persistence`: Repository read failed
pub fn get_author<R: LibraryRepository>(repo: &R, author_id: &str) -> Result<Value> {
    log_op_start!("get_author", author_id = author_id);
    let start = std::time::Instant::now();

    let result = get_author_impl(repo, author_id).map_err(|e| {
        log_op_error!(
            "get_author",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "get_author",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok(result)
}

fn get_author_impl<R: LibraryRepository>(repo: &R, author_id: &str) -> Result<Value> {
    let id = parse_id("authorId", author_id)?;
    let author = repo
        .get_author(id)?
        .ok_or_else(|| not_found(id))?;
    Ok(author_to_representation(&author, AuthorKind::Author))
}

/// Replace an author's names from an `AuthorForUpdate` body
///
/// The body is checked before the author is looked up, so an invalid body
/// is reported even for an unknown author.
///
/// # Errors
///
/// - `MalformedInput`: Bad id, unparseable body or a member of the wrong type
/// - `ValidationFailed`: Missing or over-long names
/// - `AuthorNotFound`: No such author
/// - `ConcurrencyConflict` / `Persistence`: Commit failed
pub fn update_author<R: LibraryRepository>(
    repo: &mut R,
    author_id: &str,
    body: &[u8],
) -> Result<Value> {
    log_op_start!("update_author", author_id = author_id);
    let start = std::time::Instant::now();

    let result = update_author_impl(repo, author_id, body).map_err(|e| {
        log_op_error!(
            "update_author",
            e.clone(),
            duration_ms = start.elapsed().as_millis() as u64
        );
        e
    })?;

    log_op_end!(
        "update_author",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok(result)
}

fn update_author_impl<R: LibraryRepository>(
    repo: &mut R,
    author_id: &str,
    body: &[u8],
) -> Result<Value> {
    let id = parse_id("authorId", author_id)?;
    let representation = parse_body(body)?;
    let update = author_from_representation(&representation, AuthorKind::AuthorForUpdate)?;
    check(AuthorForUpdateValidator.validate(&representation))?;

    let mut author = repo.get_author(id)?.ok_or_else(|| not_found(id))?;
    update.apply_to(&mut author);
    repo.update_author(author.clone());
    repo.persist()?;

    Ok(author_to_representation(&author, AuthorKind::Author))
}

/// Apply a JSON Patch document to an author
///
/// The document is parsed first, then the author is fetched; no operation
/// runs for an unknown author. Operations apply to the `AuthorForUpdate`
/// shape. Nothing is persisted unless every operation applies and the
/// result validates.
///
/// # Errors
///
/// - `MalformedInput`: Bad id or a body that is not a patch document
/// - `AuthorNotFound`: No such author
/// - `PatchFailed`: An operation could not be applied (carries its index)
/// - `ValidationFailed`: The patched shape is not a valid author
/// - `ConcurrencyConflict` / `Persistence`: Commit failed
pub fn patch_author<R: LibraryRepository>(
    repo: &mut R,
    author_id: &str,
    body: &[u8],
) -> Result<Value> {
    log_op_start!("patch_author", author_id = author_id);
    let start = std::time::Instant::now();

    let result = patch_author_impl(repo, author_id, body).map_err(|e| {
        match &e {
            LibrisError::PatchFailed(failure) => log_op_error!(
                "patch_author",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64,
                op_index = failure.index
            ),
            _ => log_op_error!(
                "patch_author",
                e.clone(),
                duration_ms = start.elapsed().as_millis() as u64
            ),
        }
        e
    })?;

    log_op_end!(
        "patch_author",
        duration_ms = start.elapsed().as_millis() as u64
    );
    Ok(result)
}

fn patch_author_impl<R: LibraryRepository>(
    repo: &mut R,
    author_id: &str,
    body: &[u8],
) -> Result<Value> {
    let id = parse_id("authorId", author_id)?;
    let document = PatchDocument::from_slice(body)?;
    let mut author = repo.get_author(id)?.ok_or_else(|| not_found(id))?;

    let target = author_to_representation(&author, AuthorKind::AuthorForUpdate);
    let patched = patch::apply_and_validate(&target, &document.operations, &AuthorForUpdateValidator)?;
    tracing::debug!(author_id = %id, op_count = document.len(), "patch applied");

    // A shape the patch broke is a validation failure here, not bad input
    let update = author_from_representation(&patched, AuthorKind::AuthorForUpdate).map_err(|e| {
        match e {
            LibrisError::MalformedInput { field, reason } => {
                let mut errors = libris_core::rules::ValidationErrors::new();
                errors.insert(field.unwrap_or_default(), vec![reason]);
                LibrisError::ValidationFailed { errors }
            }
            other => other,
        }
    })?;

    update.apply_to(&mut author);
    repo.update_author(author.clone());
    repo.persist()?;

    Ok(author_to_representation(&author, AuthorKind::Author))
}

fn not_found(id: Uuid) -> LibrisError {
    LibrisError::AuthorNotFound {
        author_id: id.to_string(),
    }
}
