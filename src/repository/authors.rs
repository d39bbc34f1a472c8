//! Authors repository

use sqlx::{Pool, Postgres};

use super::PageRequest;
use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorInput},
};

const AUTHOR_COLUMNS: &str = "id, first_name, last_name, date_of_birth, date_of_death";

#[derive(Clone)]
pub struct AuthorsRepository {
    pool: Pool<Postgres>,
}

impl AuthorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List authors ordered by (last_name, first_name), with total count
    pub async fn list(&self, page: PageRequest) -> AppResult<(Vec<Author>, i64)> {
        let total = self.count().await?;

        let query = format!(
            "SELECT {} FROM authors ORDER BY last_name, first_name, id LIMIT $1 OFFSET $2",
            AUTHOR_COLUMNS
        );
        let rows = sqlx::query_as::<_, Author>(&query)
            .bind(page.per_page)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Author> {
        let query = format!("SELECT {} FROM authors WHERE id = $1", AUTHOR_COLUMNS);
        sqlx::query_as::<_, Author>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    pub async fn create(&self, data: &AuthorInput) -> AppResult<Author> {
        let query = format!(
            r#"
            INSERT INTO authors (first_name, last_name, date_of_birth, date_of_death)
            VALUES ($1, $2, $3, $4)
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        );
        let row = sqlx::query_as::<_, Author>(&query)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(data.date_of_birth)
            .bind(data.date_of_death)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    pub async fn update(&self, id: i32, data: &AuthorInput) -> AppResult<Author> {
        let query = format!(
            r#"
            UPDATE authors
            SET first_name = $2, last_name = $3, date_of_birth = $4, date_of_death = $5
            WHERE id = $1
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        );
        sqlx::query_as::<_, Author>(&query)
            .bind(id)
            .bind(&data.first_name)
            .bind(&data.last_name)
            .bind(data.date_of_birth)
            .bind(data.date_of_death)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Author {} not found", id)))
    }

    /// Delete an author; the books foreign key restricts this while books remain
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Author {} not found", id)));
        }
        Ok(())
    }

    /// Number of books referencing an author
    pub async fn count_books(&self, id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE author_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
