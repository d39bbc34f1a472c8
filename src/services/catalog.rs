//! Catalog home page service

use crate::{
    error::AppResult,
    models::{book_instance::LoanStatus, catalog::CatalogSummary},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Record counts for the home page
    pub async fn index(&self) -> AppResult<CatalogSummary> {
        Ok(CatalogSummary {
            num_books: self.repository.books.count().await?,
            num_instances: self.repository.book_instances.count().await?,
            num_instances_available: self
                .repository
                .book_instances
                .count_by_status(LoanStatus::Available)
                .await?,
            num_authors: self.repository.authors.count().await?,
            num_genres: self.repository.genres.count().await?,
        })
    }

    /// Check database connectivity
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.ping().await
    }
}
