//! Language management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::language::{Language, LanguageInput},
    repository::Repository,
};

#[derive(Clone)]
pub struct LanguagesService {
    repository: Repository,
}

impl LanguagesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Language>> {
        self.repository.languages.list().await
    }

    pub async fn get(&self, id: i32) -> AppResult<Language> {
        self.repository.languages.get_by_id(id).await
    }

    /// Create a language; names are unique regardless of case
    pub async fn create(&self, mut data: LanguageInput) -> AppResult<Language> {
        data.name = data.name.trim().to_string();
        data.validate()?;

        if self.repository.languages.name_exists(&data.name, None).await? {
            return Err(AppError::Conflict(format!(
                "Language with name \"{}\" already exists",
                data.name
            )));
        }

        let created = self.repository.languages.create(&data).await?;
        tracing::info!("Created language id={} name={}", created.id, created);
        Ok(created)
    }

    pub async fn update(&self, id: i32, mut data: LanguageInput) -> AppResult<Language> {
        data.name = data.name.trim().to_string();
        data.validate()?;

        self.repository.languages.get_by_id(id).await?;
        if self.repository.languages.name_exists(&data.name, Some(id)).await? {
            return Err(AppError::Conflict(format!(
                "Language with name \"{}\" already exists",
                data.name
            )));
        }

        let updated = self.repository.languages.update(id, &data).await?;
        tracing::info!("Updated language id={} name={}", updated.id, updated);
        Ok(updated)
    }

    /// Delete a language; books written in it keep existing without a language
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let books = self.repository.languages.count_books(id).await?;
        self.repository.languages.delete(id).await?;
        tracing::info!("Deleted language id={}, cleared on {} book(s)", id, books);
        Ok(())
    }
}
