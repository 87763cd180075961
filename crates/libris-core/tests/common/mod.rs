use libris_core::{ApiVersion, Author, InMemoryStore, Registration, SelectorOptions, VersionSet};
use libris_core::{ActionSelector, HttpMethod};

pub const BOOK: &str = "application/vendor.marvin.book+json";
pub const BOOK_CONCAT: &str = "application/vendor.marvin.bookwithconcatenatedauthorname+json";
pub const BOOK_FOR_CREATION: &str = "application/vendor.marvin.bookforcreation+json";
pub const BOOK_WITH_PAGES: &str = "application/vendor.marvin.bookforcreationwithamountofpages+json";

/// The library registration table, keyed by action name
#[allow(dead_code)]
pub fn library_registrations() -> Vec<Registration<&'static str>> {
    let v1 = VersionSet::only(&[ApiVersion::new(1, 0)]);
    let v1_v2 = VersionSet::only(&[ApiVersion::new(1, 0), ApiVersion::new(2, 0)]);
    let default = VersionSet::only(&[ApiVersion::new(1, 0)]);
    vec![
        Registration::new("get_authors", "get_authors", HttpMethod::Get, "/api/v{version}/authors")
            .versions(v1_v2),
        Registration::new("get_author", "get_author", HttpMethod::Get, "/api/v{version}/authors/{authorId}")
            .versions(v1.clone()),
        Registration::new("update_author", "update_author", HttpMethod::Put, "/api/v{version}/authors/{authorId}")
            .consumes(&["application/json"])
            .versions(v1.clone()),
        Registration::new("patch_author", "patch_author", HttpMethod::Patch, "/api/v{version}/authors/{authorId}")
            .consumes(&["application/json-patch+json", "application/json"])
            .versions(v1),
        Registration::new("get_books", "get_books", HttpMethod::Get, "/api/authors/{authorId}/books")
            .versions(default.clone()),
        Registration::new("get_book", "get_book", HttpMethod::Get, "/api/authors/{authorId}/books/{bookId}")
            .produces(&["application/json", BOOK])
            .versions(default.clone()),
        Registration::new(
            "get_book_with_concatenated_author_name",
            "get_book_with_concatenated_author_name",
            HttpMethod::Get,
            "/api/authors/{authorId}/books/{bookId}",
        )
        .produces(&[BOOK_CONCAT])
        .versions(default.clone()),
        Registration::new("create_book", "create_book", HttpMethod::Post, "/api/authors/{authorId}/books")
            .consumes(&["application/json", BOOK_FOR_CREATION])
            .versions(default.clone()),
        Registration::new(
            "create_book_with_amount_of_pages",
            "create_book_with_amount_of_pages",
            HttpMethod::Post,
            "/api/authors/{authorId}/books",
        )
        .consumes(&[BOOK_WITH_PAGES])
        .versions(default),
    ]
}

/// Selector over the library table with default options
#[allow(dead_code)]
pub fn library_selector() -> ActionSelector<&'static str> {
    ActionSelector::new(SelectorOptions::default(), library_registrations())
        .expect("library table is valid")
}

/// Store holding one author
#[allow(dead_code)]
pub fn store_with_author(first: &str, last: &str) -> (InMemoryStore, Author) {
    let store = InMemoryStore::new();
    let author = Author::new(first, last);
    store.insert_author(author.clone()).expect("insert author");
    (store, author)
}
