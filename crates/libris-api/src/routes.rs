//! The registration table of the library surface.

use libris_core::{ApiVersion, HttpMethod, Registration, VersionSet};

pub const JSON: &str = "application/json";
pub const JSON_PATCH: &str = "application/json-patch+json";
pub const BOOK: &str = "application/vendor.marvin.book+json";
pub const BOOK_WITH_CONCATENATED_AUTHOR_NAME: &str =
    "application/vendor.marvin.bookwithconcatenatedauthorname+json";
pub const BOOK_FOR_CREATION: &str = "application/vendor.marvin.bookforcreation+json";
pub const BOOK_FOR_CREATION_WITH_AMOUNT_OF_PAGES: &str =
    "application/vendor.marvin.bookforcreationwithamountofpages+json";

const AUTHORS: &str = "/api/v{version}/authors";
const AUTHOR: &str = "/api/v{version}/authors/{authorId}";
const BOOKS: &str = "/api/authors/{authorId}/books";
const BOOK_ROUTE: &str = "/api/authors/{authorId}/books/{bookId}";

/// Every handler the surface can dispatch to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    GetAuthors,
    GetAuthor,
    UpdateAuthor,
    PatchAuthor,
    GetBooks,
    GetBook,
    GetBookWithConcatenatedAuthorName,
    CreateBook,
    CreateBookWithAmountOfPages,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::GetAuthors => "GetAuthors",
            Action::GetAuthor => "GetAuthor",
            Action::UpdateAuthor => "UpdateAuthor",
            Action::PatchAuthor => "PatchAuthor",
            Action::GetBooks => "GetBooks",
            Action::GetBook => "GetBook",
            Action::GetBookWithConcatenatedAuthorName => "GetBookWithConcatenatedAuthorName",
            Action::CreateBook => "CreateBook",
            Action::CreateBookWithAmountOfPages => "CreateBookWithAmountOfPages",
        }
    }
}

/// The registration table. Routes without a version segment serve the
/// default version only.
pub fn registrations(default_version: ApiVersion) -> Vec<Registration<Action>> {
    let v1 = VersionSet::only(&[ApiVersion::new(1, 0)]);
    let default = VersionSet::only(&[default_version]);

    vec![
        Registration::new(Action::GetAuthors, Action::GetAuthors.name(), HttpMethod::Get, AUTHORS)
            .versions(VersionSet::only(&[ApiVersion::new(1, 0), ApiVersion::new(2, 0)])),
        Registration::new(Action::GetAuthor, Action::GetAuthor.name(), HttpMethod::Get, AUTHOR)
            .versions(v1.clone()),
        Registration::new(Action::UpdateAuthor, Action::UpdateAuthor.name(), HttpMethod::Put, AUTHOR)
            .consumes(&[JSON])
            .versions(v1.clone()),
        Registration::new(Action::PatchAuthor, Action::PatchAuthor.name(), HttpMethod::Patch, AUTHOR)
            .consumes(&[JSON_PATCH, JSON])
            .versions(v1),
        Registration::new(Action::GetBooks, Action::GetBooks.name(), HttpMethod::Get, BOOKS)
            .versions(default.clone()),
        Registration::new(Action::GetBook, Action::GetBook.name(), HttpMethod::Get, BOOK_ROUTE)
            .produces(&[JSON, BOOK])
            .versions(default.clone()),
        Registration::new(
            Action::GetBookWithConcatenatedAuthorName,
            Action::GetBookWithConcatenatedAuthorName.name(),
            HttpMethod::Get,
            BOOK_ROUTE,
        )
        .produces(&[BOOK_WITH_CONCATENATED_AUTHOR_NAME])
        .versions(default.clone()),
        Registration::new(Action::CreateBook, Action::CreateBook.name(), HttpMethod::Post, BOOKS)
            .consumes(&[JSON, BOOK_FOR_CREATION])
            .versions(default.clone()),
        Registration::new(
            Action::CreateBookWithAmountOfPages,
            Action::CreateBookWithAmountOfPages.name(),
            HttpMethod::Post,
            BOOKS,
        )
        .consumes(&[BOOK_FOR_CREATION_WITH_AMOUNT_OF_PAGES])
        .versions(default),
    ]
}
