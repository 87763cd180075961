pub mod repository;
pub mod store;

pub use repository::LibraryRepository;
pub use store::{InMemoryStore, StoreSession};
