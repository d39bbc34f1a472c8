//! Books repository, including the book/genre links

use std::collections::HashMap;

use sqlx::{Pool, Postgres, Row};

use super::PageRequest;
use crate::{
    error::{AppError, AppResult},
    models::{
        book::{Book, BookInput, BookListRow},
        genre::Genre,
    },
};

const BOOK_COLUMNS: &str = "id, title, author_id, summary, isbn, language_id";

// Author ordering (last name, first name) stands in for "author" in the book ordering
const BOOK_LIST_SELECT: &str = r#"
    SELECT b.id, b.title, b.author_id,
           a.first_name AS author_first_name,
           a.last_name AS author_last_name
    FROM books b
    LEFT JOIN authors a ON a.id = b.author_id
"#;

const BOOK_LIST_ORDER: &str = "ORDER BY b.title, a.last_name, a.first_name, b.id";

#[derive(Clone)]
pub struct BooksRepository {
    pool: Pool<Postgres>,
}

impl BooksRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    // =========================================================================
    // READ
    // =========================================================================

    /// List books ordered by (title, author), with total count
    pub async fn list(&self, page: PageRequest) -> AppResult<(Vec<BookListRow>, i64)> {
        let total = self.count().await?;

        let query = format!("{} {} LIMIT $1 OFFSET $2", BOOK_LIST_SELECT, BOOK_LIST_ORDER);
        let rows = sqlx::query_as::<_, BookListRow>(&query)
            .bind(page.per_page)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// Books written by an author, in book ordering
    pub async fn list_by_author(&self, author_id: i32) -> AppResult<Vec<BookListRow>> {
        let query = format!("{} WHERE b.author_id = $1 {}", BOOK_LIST_SELECT, BOOK_LIST_ORDER);
        let rows = sqlx::query_as::<_, BookListRow>(&query)
            .bind(author_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Book> {
        let query = format!("SELECT {} FROM books WHERE id = $1", BOOK_COLUMNS);
        sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))
    }

    /// Genres of one book, by name
    pub async fn get_genres(&self, book_id: i32) -> AppResult<Vec<Genre>> {
        let rows = sqlx::query_as::<_, Genre>(
            r#"
            SELECT g.id, g.name
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = $1
            ORDER BY LOWER(g.name), g.id
            "#,
        )
        .bind(book_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    /// Genre names for several books at once, keyed by book id
    pub async fn genre_names(&self, book_ids: &[i32]) -> AppResult<HashMap<i32, Vec<String>>> {
        if book_ids.is_empty() {
            return Ok(HashMap::new());
        }

        let rows = sqlx::query(
            r#"
            SELECT bg.book_id, g.name
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = ANY($1)
            ORDER BY bg.book_id, LOWER(g.name), g.id
            "#,
        )
        .bind(book_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut names: HashMap<i32, Vec<String>> = HashMap::new();
        for row in rows {
            names
                .entry(row.get("book_id"))
                .or_default()
                .push(row.get("name"));
        }
        Ok(names)
    }

    /// Check whether an ISBN is taken by another book
    pub async fn isbn_exists(&self, isbn: &str, exclude_id: Option<i32>) -> AppResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM books WHERE isbn = $1 AND ($2::int IS NULL OR id <> $2))",
        )
        .bind(isbn)
        .bind(exclude_id)
        .fetch_one(&self.pool)
        .await?;
        Ok(exists)
    }

    /// Number of copies referencing a book
    pub async fn count_instances(&self, id: i32) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE book_id = $1")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    // =========================================================================
    // WRITE
    // =========================================================================

    /// Insert a book and its genre links in one transaction
    pub async fn create(&self, data: &BookInput) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            INSERT INTO books (title, author_id, summary, isbn, language_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(&data.title)
            .bind(data.author_id)
            .bind(&data.summary)
            .bind(&data.isbn)
            .bind(data.language_id)
            .fetch_one(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO book_genres (book_id, genre_id) SELECT $1, UNNEST($2::int[]) ON CONFLICT DO NOTHING",
        )
        .bind(book.id)
        .bind(&data.genre_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(book)
    }

    /// Replace a book's fields and genre links in one transaction
    pub async fn update(&self, id: i32, data: &BookInput) -> AppResult<Book> {
        let mut tx = self.pool.begin().await?;

        let query = format!(
            r#"
            UPDATE books
            SET title = $2, author_id = $3, summary = $4, isbn = $5, language_id = $6
            WHERE id = $1
            RETURNING {}
            "#,
            BOOK_COLUMNS
        );
        let book = sqlx::query_as::<_, Book>(&query)
            .bind(id)
            .bind(&data.title)
            .bind(data.author_id)
            .bind(&data.summary)
            .bind(&data.isbn)
            .bind(data.language_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book {} not found", id)))?;

        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO book_genres (book_id, genre_id) SELECT $1, UNNEST($2::int[]) ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(&data.genre_ids)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(book)
    }

    /// Delete a book; the book_instances foreign key restricts this while copies remain
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book {} not found", id)));
        }
        Ok(())
    }
}
