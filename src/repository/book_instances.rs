//! Book instances repository

use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use super::PageRequest;
use crate::{
    error::{AppError, AppResult},
    models::book_instance::{BookInstanceInput, BookInstanceRow, DueBackRange, LoanStatus},
};

const INSTANCE_SELECT: &str = r#"
    SELECT bi.id, bi.book_id, b.title AS book_title, bi.imprint,
           bi.due_back, bi.borrower_id, bi.status
    FROM book_instances bi
    LEFT JOIN books b ON b.id = bi.book_id
"#;

// Optional filters: $1 status, $2/$3 due_back range, $4 due_back null check
const INSTANCE_FILTER: &str = r#"
    WHERE ($1::varchar IS NULL OR bi.status = $1)
      AND ($2::date IS NULL OR bi.due_back >= $2)
      AND ($3::date IS NULL OR bi.due_back < $3)
      AND ($4::bool IS NULL OR (bi.due_back IS NULL) = $4)
"#;

/// Bind values for a due-back range: (start, end, due_back IS NULL)
fn range_params(range: DueBackRange) -> (Option<NaiveDate>, Option<NaiveDate>, Option<bool>) {
    match range {
        DueBackRange::Any => (None, None, None),
        DueBackRange::Between(start, end) => (Some(start), Some(end), None),
        DueBackRange::IsNull => (None, None, Some(true)),
        DueBackRange::NotNull => (None, None, Some(false)),
    }
}

#[derive(Clone)]
pub struct BookInstancesRepository {
    pool: Pool<Postgres>,
}

impl BookInstancesRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// List copies ordered by due date (unset last), with total count
    pub async fn list(
        &self,
        status: Option<LoanStatus>,
        due_back: DueBackRange,
        page: PageRequest,
    ) -> AppResult<(Vec<BookInstanceRow>, i64)> {
        let (start, end, is_null) = range_params(due_back);

        let count_query = format!(
            "SELECT COUNT(*) FROM book_instances bi {}",
            INSTANCE_FILTER
        );
        let total: i64 = sqlx::query_scalar(&count_query)
            .bind(status)
            .bind(start)
            .bind(end)
            .bind(is_null)
            .fetch_one(&self.pool)
            .await?;

        let select_query = format!(
            "{} {} ORDER BY bi.due_back ASC NULLS LAST, bi.id LIMIT $5 OFFSET $6",
            INSTANCE_SELECT, INSTANCE_FILTER
        );
        let rows = sqlx::query_as::<_, BookInstanceRow>(&select_query)
            .bind(status)
            .bind(start)
            .bind(end)
            .bind(is_null)
            .bind(page.per_page)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    /// Copies of one book, ordered by due date
    pub async fn list_by_book(&self, book_id: i32) -> AppResult<Vec<BookInstanceRow>> {
        let query = format!(
            "{} WHERE bi.book_id = $1 ORDER BY bi.due_back ASC NULLS LAST, bi.id",
            INSTANCE_SELECT
        );
        let rows = sqlx::query_as::<_, BookInstanceRow>(&query)
            .bind(book_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    pub async fn get_by_id(&self, id: Uuid) -> AppResult<BookInstanceRow> {
        let query = format!("{} WHERE bi.id = $1", INSTANCE_SELECT);
        sqlx::query_as::<_, BookInstanceRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Book instance {} not found", id)))
    }

    /// Insert a copy under a freshly generated id
    pub async fn create(&self, data: &BookInstanceInput) -> AppResult<BookInstanceRow> {
        let id = Uuid::new_v4();
        sqlx::query(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, due_back, borrower_id, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(data.book_id)
        .bind(&data.imprint)
        .bind(data.due_back)
        .bind(data.borrower_id)
        .bind(data.status)
        .execute(&self.pool)
        .await?;

        self.get_by_id(id).await
    }

    pub async fn update(&self, id: Uuid, data: &BookInstanceInput) -> AppResult<BookInstanceRow> {
        let result = sqlx::query(
            r#"
            UPDATE book_instances
            SET book_id = $2, imprint = $3, due_back = $4, borrower_id = $5, status = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(data.book_id)
        .bind(&data.imprint)
        .bind(data.due_back)
        .bind(data.borrower_id)
        .bind(data.status)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        self.get_by_id(id).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::NotFound(format!("Book instance {} not found", id)));
        }
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    pub async fn count_by_status(&self, status: LoanStatus) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM book_instances WHERE status = $1")
            .bind(status)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
