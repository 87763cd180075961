pub mod author;
pub mod book;

pub use author::{Author, AuthorUpdate};
pub use book::{Book, NewBook};
