//! Languages repository

use sqlx::{Pool, Postgres};

use crate::{
    error::{AppError, AppResult},
    models::language::{Language, LanguageInput},
};

#[derive(Clone)]
pub struct LanguagesRepository {
    pool: Pool<Postgres>,
}

impl LanguagesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List all languages by name
    pub async fn list(&self) -> AppResult<Vec<Language>> {
        let rows = sqlx::query_as::<_, Language>("SELECT id, name FROM languages ORDER BY LOWER(name), id")
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Language> {
        sqlx::query_as::<_, Language>("SELECT id, name FROM languages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Language {} not found", id)))
    }

    /// Case-insensitive name lookup, optionally ignoring one row (the one being edited)
    pub async fn name_exists(&self, name: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM languages WHERE LOWER(name) = LOWER($1) AND ($2::int IS NULL OR id <> $2))",
        )
        .bind(name)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    pub async fn create(&self, data: &LanguageInput) -> AppResult<Language> {
        let row = sqlx::query_as::<_, Language>("INSERT INTO languages (name) VALUES ($1) RETURNING id, name")
            .bind(&data.name)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i32, data: &LanguageInput) -> AppResult<Language> {
        sqlx::query_as::<_, Language>("UPDATE languages SET name = $2 WHERE id = $1 RETURNING id, name")
            .bind(id)
            .bind(&data.name)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Language {} not found", id)))
    }

    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM languages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Language {} not found", id)));
        }
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM languages")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Number of books written in a language
    pub async fn count_books(&self, id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE language_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
