//! Data models for the catalog

pub mod author;
pub mod book;
pub mod book_instance;
pub mod catalog;
pub mod genre;
pub mod language;
pub mod user;

// Re-export commonly used types
pub use author::{Author, AuthorDetail, AuthorListEntry};
pub use book::{Book, BookDetail, BookListEntry};
pub use book_instance::{BookInstance, BookInstanceDetail, BookInstanceListEntry, LoanStatus};
pub use catalog::CatalogSummary;
pub use genre::Genre;
pub use language::Language;
pub use user::{User, UserClaims, UserShort};
