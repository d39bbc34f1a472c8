//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{
    auth, authors, book_instances, books, catalog, genres, health, languages, users,
};

/// Registers the bearer token scheme referenced by the admin endpoints
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Catalog API",
        version = "0.3.0",
        description = "Books, authors, genres, languages and loanable copies"
    ),
    paths(
        // Catalog
        catalog::index,
        catalog::list_books,
        catalog::get_book,
        catalog::list_authors,
        catalog::get_author,
        // Health
        health::health_check,
        health::readiness_check,
        // Auth
        auth::login,
        auth::me,
        // Admin: reference tables
        genres::list_genres,
        genres::get_genre,
        genres::create_genre,
        genres::update_genre,
        genres::delete_genre,
        languages::list_languages,
        languages::get_language,
        languages::create_language,
        languages::update_language,
        languages::delete_language,
        // Admin: authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::update_author,
        authors::delete_author,
        authors::list_author_books,
        authors::create_author_book,
        // Admin: books
        books::list_books,
        books::get_book,
        books::create_book,
        books::update_book,
        books::delete_book,
        books::list_book_instances,
        books::create_book_instance,
        // Admin: book instances
        book_instances::list_book_instances,
        book_instances::get_book_instance,
        book_instances::create_book_instance,
        book_instances::update_book_instance,
        book_instances::delete_book_instance,
        // Admin: users
        users::list_users,
        users::get_user,
        users::create_user,
        users::delete_user,
    ),
    components(
        schemas(
            // Catalog
            crate::models::catalog::CatalogSummary,
            crate::api::BookPage,
            crate::api::AuthorPage,
            crate::api::BookInstancePage,
            // Genres & languages
            crate::models::genre::Genre,
            crate::models::genre::GenreInput,
            crate::models::language::Language,
            crate::models::language::LanguageInput,
            // Authors
            crate::models::author::Author,
            crate::models::author::AuthorInput,
            crate::models::author::AuthorListEntry,
            crate::models::author::AuthorRef,
            crate::models::author::AuthorDetail,
            // Books
            crate::models::book::Book,
            crate::models::book::BookInput,
            crate::models::book::BookListEntry,
            crate::models::book::BookDetail,
            // Book instances
            crate::models::book_instance::LoanStatus,
            crate::models::book_instance::DueBackFilter,
            crate::models::book_instance::BookInstance,
            crate::models::book_instance::BookInstanceInput,
            crate::models::book_instance::InlineBookInstanceInput,
            crate::models::book_instance::BookInstanceListEntry,
            crate::models::book_instance::BookRef,
            crate::models::book_instance::GeneralFieldset,
            crate::models::book_instance::AvailabilityFieldset,
            crate::models::book_instance::BookInstanceDetail,
            // Users
            crate::models::user::User,
            crate::models::user::UserShort,
            crate::models::user::CreateUser,
            auth::LoginRequest,
            auth::LoginResponse,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "catalog", description = "Public catalog pages"),
        (name = "health", description = "Health check endpoints"),
        (name = "auth", description = "Authentication endpoints"),
        (name = "admin", description = "Staff administration of the catalog")
    )
)]
pub struct ApiDoc;

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
