//! Language model

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

/// Natural language a book is written in (e.g. English, Farsi)
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Language {
    pub id: i32,
    /// Unique case-insensitively
    pub name: String,
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

/// Create or replace a language
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LanguageInput {
    #[validate(length(min = 1, max = 200, message = "Language name must be 1-200 characters"))]
    pub name: String,
}
