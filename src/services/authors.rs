//! Author management service

use validator::Validate;

use super::books::list_entries;
use crate::{
    error::{AppError, AppResult},
    models::author::{Author, AuthorDetail, AuthorInput, AuthorListEntry},
    repository::{PageRequest, Repository},
};

fn normalize(mut data: AuthorInput) -> AuthorInput {
    data.first_name = data.first_name.trim().to_string();
    data.last_name = data.last_name.trim().to_string();
    data
}

#[derive(Clone)]
pub struct AuthorsService {
    repository: Repository,
}

impl AuthorsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// List authors ordered by last name, then first name
    pub async fn list(&self, page: PageRequest) -> AppResult<(Vec<AuthorListEntry>, i64)> {
        let (authors, total) = self.repository.authors.list(page).await?;
        Ok((authors.into_iter().map(AuthorListEntry::from).collect(), total))
    }

    /// Get an author with their books
    pub async fn get_detail(&self, id: i32) -> AppResult<AuthorDetail> {
        let author = self.repository.authors.get_by_id(id).await?;
        let rows = self.repository.books.list_by_author(id).await?;
        let books = list_entries(&self.repository, rows).await?;
        Ok(AuthorDetail {
            author: author.into(),
            books,
        })
    }

    pub async fn create(&self, data: AuthorInput) -> AppResult<Author> {
        let data = normalize(data);
        data.validate()?;

        let author = self.repository.authors.create(&data).await?;
        tracing::info!("Created author id={} name={}", author.id, author);
        Ok(author)
    }

    pub async fn update(&self, id: i32, data: AuthorInput) -> AppResult<Author> {
        let data = normalize(data);
        data.validate()?;

        let author = self.repository.authors.update(id, &data).await?;
        tracing::info!("Updated author id={} name={}", author.id, author);
        Ok(author)
    }

    /// Delete an author, refused while books reference them
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let author = self.repository.authors.get_by_id(id).await?;

        let books = self.repository.authors.count_books(id).await?;
        if books > 0 {
            return Err(AppError::Restricted(format!(
                "Author \"{}\" still has {} book(s)",
                author, books
            )));
        }

        self.repository.authors.delete(id).await?;
        tracing::info!("Deleted author id={} name={}", id, author);
        Ok(())
    }
}
