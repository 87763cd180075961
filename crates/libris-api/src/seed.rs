//! Demo library loaded with `--seed`.

use libris_core::{Author, Book, InMemoryStore, Result};
use uuid::Uuid;

struct SeedBook {
    id: u128,
    title: &'static str,
    description: &'static str,
}

struct SeedAuthor {
    id: u128,
    first_name: &'static str,
    last_name: &'static str,
    books: &'static [SeedBook],
}

const LIBRARY: &[SeedAuthor] = &[
    SeedAuthor {
        id: 0xd28888e9_2ba9_473a_a40f_e38cb54f9b35,
        first_name: "George",
        last_name: "RR Martin",
        books: &[
            SeedBook {
                id: 0x5b1c2b4d_48c7_402a_80c3_cc796ad49c6b,
                title: "The Winds of Winter",
                description: "The book that seems impossible to write.",
            },
            SeedBook {
                id: 0xd8663e5e_7494_4f81_8739_6e0de1bea7ee,
                title: "A Game of Thrones",
                description: "The first novel in the series.",
            },
        ],
    },
    SeedAuthor {
        id: 0xda2fd609_d754_4feb_8acd_c4f9ff13ba96,
        first_name: "Stephen",
        last_name: "Fry",
        books: &[SeedBook {
            id: 0xd173e20d_6ccb_4bda_8f2f_b1df1d0d1a55,
            title: "Mythos",
            description: "The Greek myths retold.",
        }],
    },
    SeedAuthor {
        id: 0x2902b665_1190_4c70_9915_b9c2d7680450,
        first_name: "Douglas",
        last_name: "Adams",
        books: &[SeedBook {
            id: 0x493c3228_3444_4a49_9cc0_e8532edc59b2,
            title: "The Hitchhiker's Guide to the Galaxy",
            description: "Don't panic.",
        }],
    },
];

/// Load the demo authors and books into `store`
///
/// # Errors
///
/// `Persistence` if the store rejects an insert.
pub fn load(store: &InMemoryStore) -> Result<usize> {
    let mut books = 0;
    for author in LIBRARY {
        let author_id = Uuid::from_u128(author.id);
        store.insert_author(Author::with_id(author_id, author.first_name, author.last_name))?;
        for book in author.books {
            store.insert_book(Book {
                id: Uuid::from_u128(book.id),
                author_id,
                title: book.title.to_string(),
                description: Some(book.description.to_string()),
                amount_of_pages: None,
                version: 0,
            })?;
            books += 1;
        }
    }
    tracing::info!(authors = LIBRARY.len(), books, "demo library loaded");
    Ok(books)
}

#[cfg(test)]
mod tests {
    use super::*;
    use libris_core::LibraryRepository;

    #[test]
    fn test_load_fills_store() {
        let store = InMemoryStore::new();
        assert_eq!(load(&store).unwrap(), 4);

        let session = store.session();
        let authors = session.list_authors().unwrap();
        assert_eq!(authors.len(), 3);
        // Sorted by first name
        assert_eq!(authors[0].first_name, "Douglas");
        let martin = Uuid::from_u128(LIBRARY[0].id);
        assert_eq!(session.list_books(martin).unwrap().len(), 2);
    }
}
