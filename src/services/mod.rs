//! Business logic services

pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;
pub mod languages;
pub mod users;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub catalog: catalog::CatalogService,
    pub genres: genres::GenresService,
    pub languages: languages::LanguagesService,
    pub authors: authors::AuthorsService,
    pub books: books::BooksService,
    pub book_instances: book_instances::BookInstancesService,
    pub users: users::UsersService,
}

impl Services {
    /// Create all services with the given repository
    pub fn new(repository: Repository, auth_config: AuthConfig) -> Self {
        Self {
            catalog: catalog::CatalogService::new(repository.clone()),
            genres: genres::GenresService::new(repository.clone()),
            languages: languages::LanguagesService::new(repository.clone()),
            authors: authors::AuthorsService::new(repository.clone()),
            books: books::BooksService::new(repository.clone()),
            book_instances: book_instances::BookInstancesService::new(repository.clone()),
            users: users::UsersService::new(repository, auth_config),
        }
    }
}

/// A row referenced from a form that does not exist is a bad input, not a missing page
pub(crate) fn referenced<T>(result: AppResult<T>) -> AppResult<T> {
    result.map_err(|e| match e {
        AppError::NotFound(msg) => AppError::Validation(msg),
        other => other,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referenced_maps_not_found() {
        let res: AppResult<()> = referenced(Err(AppError::NotFound("Author 9 not found".into())));
        assert!(matches!(res, Err(AppError::Validation(msg)) if msg == "Author 9 not found"));

        let res: AppResult<()> = referenced(Err(AppError::Conflict("dup".into())));
        assert!(matches!(res, Err(AppError::Conflict(_))));
    }
}
