//! Book instance (copy) management service

use uuid::Uuid;
use validator::Validate;

use super::referenced;
use crate::{
    error::AppResult,
    models::book_instance::{
        today, BookInstanceDetail, BookInstanceInput, BookInstanceListEntry, BookInstanceQuery,
        BookInstanceRow, InlineBookInstanceInput,
    },
    repository::{PageRequest, Repository},
};

#[derive(Clone)]
pub struct BookInstancesService {
    repository: Repository,
}

impl BookInstancesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List copies filtered by status and due date, ordered by due date
    pub async fn list(
        &self,
        query: &BookInstanceQuery,
        page: PageRequest,
    ) -> AppResult<(Vec<BookInstanceListEntry>, i64)> {
        let today = today();
        let range = query.due_back.unwrap_or_default().range(today);

        let (rows, total) = self
            .repository
            .book_instances
            .list(query.status, range, page)
            .await?;

        Ok((
            rows.into_iter()
                .map(|row| BookInstanceListEntry::from_row(row, today))
                .collect(),
            total,
        ))
    }

    pub async fn get_detail(&self, id: Uuid) -> AppResult<BookInstanceDetail> {
        let row = self.repository.book_instances.get_by_id(id).await?;
        self.detail(row).await
    }

    async fn detail(&self, row: BookInstanceRow) -> AppResult<BookInstanceDetail> {
        let borrower = match row.borrower_id {
            Some(user_id) => self.repository.users.get_short(user_id).await?,
            None => None,
        };
        Ok(BookInstanceDetail::new(row, borrower, today()))
    }

    async fn check_references(&self, data: &BookInstanceInput) -> AppResult<()> {
        referenced(self.repository.books.get_by_id(data.book_id).await)?;
        if let Some(borrower_id) = data.borrower_id {
            referenced(self.repository.users.get_by_id(borrower_id).await)?;
        }
        Ok(())
    }

    /// Create a copy under a generated id
    pub async fn create(&self, mut data: BookInstanceInput) -> AppResult<BookInstanceDetail> {
        data.imprint = data.imprint.trim().to_string();
        data.validate()?;
        self.check_references(&data).await?;

        let row = self.repository.book_instances.create(&data).await?;
        tracing::info!("Created book instance {}", row);
        self.detail(row).await
    }

    /// Create a copy from the book form; the path decides the book
    pub async fn create_for_book(
        &self,
        book_id: i32,
        data: InlineBookInstanceInput,
    ) -> AppResult<BookInstanceDetail> {
        self.repository.books.get_by_id(book_id).await?;
        self.create(data.for_book(book_id)).await
    }

    pub async fn update(&self, id: Uuid, mut data: BookInstanceInput) -> AppResult<BookInstanceDetail> {
        data.imprint = data.imprint.trim().to_string();
        data.validate()?;

        self.repository.book_instances.get_by_id(id).await?;
        self.check_references(&data).await?;

        let row = self.repository.book_instances.update(id, &data).await?;
        tracing::info!("Updated book instance {} status={}", row, row.status);
        self.detail(row).await
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        let row = self.repository.book_instances.get_by_id(id).await?;
        self.repository.book_instances.delete(id).await?;
        tracing::info!("Deleted book instance {}", row);
        Ok(())
    }
}
