//! Book model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{
    author::AuthorRef, book_instance::BookInstanceListEntry, genre::Genre, language::Language,
};

/// Number of genres shown in the admin book list column
pub const DISPLAYED_GENRES: usize = 3;

/// Public URL of a book's detail page
pub fn book_url(id: i32) -> String {
    format!("/books/{}", id)
}

/// Genre column of the admin book list: the first few genre names, comma separated
pub fn display_genre(names: &[String]) -> String {
    names
        .iter()
        .take(DISPLAYED_GENRES)
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Book row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    /// Nullable in storage, but cannot be cleared once set
    pub author_id: Option<i32>,
    pub summary: String,
    /// 13 character ISBN, unique
    pub isbn: String,
    pub language_id: Option<i32>,
}

impl Book {
    pub fn absolute_url(&self) -> String {
        book_url(self.id)
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// Book joined with its author's names, as read for list pages
#[derive(Debug, Clone, FromRow)]
pub struct BookListRow {
    pub id: i32,
    pub title: String,
    pub author_id: Option<i32>,
    pub author_first_name: Option<String>,
    pub author_last_name: Option<String>,
}

impl BookListRow {
    pub fn author_ref(&self) -> Option<AuthorRef> {
        match (self.author_id, &self.author_first_name, &self.author_last_name) {
            (Some(id), Some(first), Some(last)) => Some(AuthorRef::new(id, first, last)),
            _ => None,
        }
    }
}

/// Book list row (admin columns: title, author, genre)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookListEntry {
    pub id: i32,
    pub title: String,
    pub author: Option<AuthorRef>,
    /// First genres of the book, comma separated
    pub genre: String,
    pub url: String,
}

impl BookListEntry {
    pub fn from_row(row: BookListRow, genre_names: &[String]) -> Self {
        Self {
            author: row.author_ref(),
            genre: display_genre(genre_names),
            url: book_url(row.id),
            id: row.id,
            title: row.title,
        }
    }
}

/// Book with its author, language, genres and copies
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BookDetail {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub url: String,
    pub author: Option<AuthorRef>,
    pub language: Option<Language>,
    pub genres: Vec<Genre>,
    pub instances: Vec<BookInstanceListEntry>,
}

/// Create or replace a book
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(length(min = 1, max = 200, message = "Title must be 1-200 characters"))]
    pub title: String,
    pub author_id: Option<i32>,
    #[validate(length(min = 1, max = 1000, message = "Summary must be 1-1000 characters"))]
    pub summary: String,
    #[validate(length(equal = 13, message = "ISBN must be exactly 13 characters"))]
    pub isbn: String,
    pub language_id: Option<i32>,
    /// At least one genre is required
    #[validate(length(min = 1, message = "Select at least one genre"))]
    pub genre_ids: Vec<i32>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_display_genre_truncates() {
        assert_eq!(
            display_genre(&names(&["Adventure", "Fantasy", "Science", "Horror"])),
            "Adventure, Fantasy, Science"
        );
        assert_eq!(display_genre(&names(&["Poetry"])), "Poetry");
        assert_eq!(display_genre(&[]), "");
    }

    #[test]
    fn test_list_entry_without_author() {
        let row = BookListRow {
            id: 4,
            title: "Beowulf".to_string(),
            author_id: None,
            author_first_name: None,
            author_last_name: None,
        };
        let entry = BookListEntry::from_row(row, &names(&["Epic"]));
        assert!(entry.author.is_none());
        assert_eq!(entry.url, "/books/4");
        assert_eq!(entry.genre, "Epic");
    }

    #[test]
    fn test_isbn_and_genre_validation() {
        let input = BookInput {
            title: "Dune".to_string(),
            author_id: Some(1),
            summary: "Spice.".to_string(),
            isbn: "978044101359".to_string(),
            language_id: None,
            genre_ids: vec![],
        };
        let errors = input.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("isbn"));
        assert!(fields.contains_key("genre_ids"));
        assert!(!fields.contains_key("title"));
    }

    #[test]
    fn test_valid_book_input() {
        let input = BookInput {
            title: "Dune".to_string(),
            author_id: Some(1),
            summary: "Spice.".to_string(),
            isbn: "9780441013593".to_string(),
            language_id: Some(2),
            genre_ids: vec![1, 2],
        };
        assert!(input.validate().is_ok());
    }
}
