//! Genre management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::genre::{Genre, GenreInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct GenresService {
    repository: Repository,
}

impl GenresService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Genre>> {
        self.repository.genres.list().await
    }

    pub async fn get(&self, id: i32) -> AppResult<Genre> {
        self.repository.genres.get_by_id(id).await
    }

    /// Create a genre; names are unique regardless of case
    pub async fn create(&self, mut data: GenreInput) -> AppResult<Genre> {
        data.name = data.name.trim().to_string();
        data.validate()?;

        if self.repository.genres.name_exists(&data.name, None).await? {
            return Err(AppError::Conflict(format!(
                "Genre with name \"{}\" already exists",
                data.name
            )));
        }

        let created = self.repository.genres.create(&data).await?;
        tracing::info!("Created genre id={} name={}", created.id, created);
        Ok(created)
    }

    pub async fn update(&self, id: i32, mut data: GenreInput) -> AppResult<Genre> {
        data.name = data.name.trim().to_string();
        data.validate()?;

        self.repository.genres.get_by_id(id).await?;
        if self.repository.genres.name_exists(&data.name, Some(id)).await? {
            return Err(AppError::Conflict(format!(
                "Genre with name \"{}\" already exists",
                data.name
            )));
        }

        let updated = self.repository.genres.update(id, &data).await?;
        tracing::info!("Updated genre id={} name={}", updated.id, updated);
        Ok(updated)
    }

    /// Delete a genre; books simply lose it
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        self.repository.genres.delete(id).await?;
        tracing::info!("Deleted genre id={}", id);
        Ok(())
    }
}
