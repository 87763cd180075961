use libris_core::model::{Author, Book, NewBook};
use libris_core::InMemoryStore;

/// Store holding one author and one of their books
#[allow(dead_code)]
pub fn seeded_store() -> (InMemoryStore, Author, Book) {
    let store = InMemoryStore::new();
    let author = Author::new("George", "Martin");
    store.insert_author(author.clone()).unwrap();
    let book = NewBook {
        title: "A Game of Thrones".to_string(),
        description: Some("The first book of A Song of Ice and Fire".to_string()),
        amount_of_pages: None,
    }
    .into_book(author.id);
    store.insert_book(book.clone()).unwrap();
    (store, author, book)
}

/// Serialize a JSON value as a request body
#[allow(dead_code)]
pub fn body(value: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&value).unwrap()
}
