//! Repository layer for database operations

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod genres;
pub mod languages;
pub mod users;

use sqlx::{Pool, Postgres};

use crate::error::AppResult;

/// Page window requested by a list endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    /// Build a page window, clamping per_page to 1..=max and page so the offset fits in an i64
    pub fn new(page: Option<i64>, per_page: Option<i64>, default_per_page: i64, max_per_page: i64) -> Self {
        let per_page = per_page.unwrap_or(default_per_page).clamp(1, max_per_page.max(1));
        Self {
            page: page.unwrap_or(1).clamp(1, i64::MAX / per_page),
            per_page,
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub genres: genres::GenresRepository,
    pub languages: languages::LanguagesRepository,
    pub authors: authors::AuthorsRepository,
    pub books: books::BooksRepository,
    pub book_instances: book_instances::BookInstancesRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            genres: genres::GenresRepository::new(pool.clone()),
            languages: languages::LanguagesRepository::new(pool.clone()),
            authors: authors::AuthorsRepository::new(pool.clone()),
            books: books::BooksRepository::new(pool.clone()),
            book_instances: book_instances::BookInstancesRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }

    /// Round-trip to the database (readiness probe)
    pub async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_request_clamping() {
        let page = PageRequest::new(None, None, 10, 100);
        assert_eq!(page, PageRequest { page: 1, per_page: 10 });
        assert_eq!(page.offset(), 0);

        let page = PageRequest::new(Some(3), Some(500), 10, 100);
        assert_eq!(page.per_page, 100);
        assert_eq!(page.offset(), 200);

        let page = PageRequest::new(Some(-2), Some(0), 10, 100);
        assert_eq!(page, PageRequest { page: 1, per_page: 1 });
    }

    #[test]
    fn test_huge_page_offset_does_not_overflow() {
        let page = PageRequest::new(Some(i64::MAX), Some(10), 10, 10);
        assert_eq!(page.page, i64::MAX / 10);
        assert!(page.offset() >= 0);
        assert_eq!(page.offset(), (i64::MAX / 10 - 1) * 10);

        let page = PageRequest::new(Some(i64::MAX), Some(1), 10, 100);
        assert_eq!(page.offset(), i64::MAX - 1);

        let page = PageRequest { page: i64::MAX, per_page: 100 };
        assert_eq!(page.offset(), i64::MAX);
    }
}
