//! Genre model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Book genre (e.g. Science Fiction, French Poetry)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Genre {
    pub id: i32,
    /// Unique case-insensitively
    pub name: String,
}

impl std::fmt::Display for Genre {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Create or replace a genre
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct GenreInput {
    #[validate(length(min = 1, max = 200, message = "Genre name must be 1-200 characters"))]
    pub name: String,
}
