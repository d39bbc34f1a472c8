//! Author model and related types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::book::BookListEntry;

/// Public URL of an author's detail page
pub fn author_url(id: i32) -> String {
    format!("/authors/{}", id)
}

/// Author row
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Author {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    /// Shown as "died" in forms
    pub date_of_death: Option<NaiveDate>,
}

impl Author {
    pub fn absolute_url(&self) -> String {
        author_url(self.id)
    }
}

impl std::fmt::Display for Author {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}, {}", self.last_name, self.first_name)
    }
}

/// Author list row (admin columns: last name, first name, birth, death)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorListEntry {
    pub id: i32,
    pub last_name: String,
    pub first_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
    pub url: String,
}

impl From<Author> for AuthorListEntry {
    fn from(author: Author) -> Self {
        let url = author.absolute_url();
        Self {
            id: author.id,
            last_name: author.last_name,
            first_name: author.first_name,
            date_of_birth: author.date_of_birth,
            date_of_death: author.date_of_death,
            url,
        }
    }
}

/// Short reference to an author embedded in book payloads
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorRef {
    pub id: i32,
    /// "Last, First"
    pub name: String,
    pub url: String,
}

impl AuthorRef {
    pub fn new(id: i32, first_name: &str, last_name: &str) -> Self {
        Self {
            id,
            name: format!("{}, {}", last_name, first_name),
            url: author_url(id),
        }
    }
}

/// Author with the books written by them
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthorDetail {
    pub author: AuthorListEntry,
    pub books: Vec<BookListEntry>,
}

/// Create or replace an author
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AuthorInput {
    #[validate(length(min = 1, max = 100, message = "First name must be 1-100 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 100, message = "Last name must be 1-100 characters"))]
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub date_of_death: Option<NaiveDate>,
}
