//! HTTP handlers: public catalog pages, API v1 and the admin surface

pub mod auth;
pub mod authors;
pub mod book_instances;
pub mod books;
pub mod catalog;
pub mod genres;
pub mod health;
pub mod languages;
pub mod openapi;
pub mod users;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use utoipa::{IntoParams, ToSchema};

use crate::{
    error::AppError,
    models::{
        author::AuthorListEntry, book::BookListEntry, book_instance::BookInstanceListEntry,
        user::UserClaims,
    },
    repository::PageRequest,
    AppState,
};

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AppError::Authentication("Missing authorization header".to_string()))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::Authentication("Invalid authorization header format".to_string()))?;

        let claims = UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string()))?;

        Ok(AuthenticatedUser(claims))
    }
}

/// Extractor for a staff account, checked against the database on every request
pub struct StaffUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for StaffUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let AuthenticatedUser(claims) = AuthenticatedUser::from_request_parts(parts, state).await?;
        state.services.users.staff_account(&claims).await?;
        Ok(StaffUser(claims))
    }
}

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
#[aliases(
    BookPage = PaginatedResponse<BookListEntry>,
    AuthorPage = PaginatedResponse<AuthorListEntry>,
    BookInstancePage = PaginatedResponse<BookInstanceListEntry>
)]
pub struct PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    /// Entries of the requested page
    pub items: Vec<T>,
    /// Total number of entries
    pub total: i64,
    /// Current page number
    pub page: i64,
    /// Entries per page
    pub per_page: i64,
}

impl<T> PaginatedResponse<T>
where
    T: for<'a> ToSchema<'a>,
{
    pub fn new(items: Vec<T>, total: i64, page: PageRequest) -> Self {
        Self {
            items,
            total,
            page: page.page,
            per_page: page.per_page,
        }
    }
}

/// Pagination query of admin lists
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number (default: 1)
    pub page: Option<i64>,
    /// Entries per page
    pub per_page: Option<i64>,
}

impl ListQuery {
    pub fn page_request(&self, state: &AppState) -> PageRequest {
        PageRequest::new(
            self.page,
            self.per_page,
            state.config.catalog.page_size,
            state.config.catalog.max_page_size,
        )
    }
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Public catalog pages
    let catalog = Router::new()
        .route("/", get(catalog::index))
        .route("/books/", get(catalog::list_books))
        .route("/books/:id", get(catalog::get_book))
        .route("/authors/", get(catalog::list_authors))
        .route("/authors/:id", get(catalog::get_author));

    // Admin surface (staff only)
    let admin = Router::new()
        .route("/genres", get(genres::list_genres).post(genres::create_genre))
        .route(
            "/genres/:id",
            get(genres::get_genre)
                .put(genres::update_genre)
                .delete(genres::delete_genre),
        )
        .route("/languages", get(languages::list_languages).post(languages::create_language))
        .route(
            "/languages/:id",
            get(languages::get_language)
                .put(languages::update_language)
                .delete(languages::delete_language),
        )
        .route("/authors", get(authors::list_authors).post(authors::create_author))
        .route(
            "/authors/:id",
            get(authors::get_author)
                .put(authors::update_author)
                .delete(authors::delete_author),
        )
        .route(
            "/authors/:id/books",
            get(authors::list_author_books).post(authors::create_author_book),
        )
        .route("/books", get(books::list_books).post(books::create_book))
        .route(
            "/books/:id",
            get(books::get_book)
                .put(books::update_book)
                .delete(books::delete_book),
        )
        .route(
            "/books/:id/instances",
            get(books::list_book_instances).post(books::create_book_instance),
        )
        .route(
            "/bookinstances",
            get(book_instances::list_book_instances).post(book_instances::create_book_instance),
        )
        .route(
            "/bookinstances/:id",
            get(book_instances::get_book_instance)
                .put(book_instances::update_book_instance)
                .delete(book_instances::delete_book_instance),
        )
        .route("/users", get(users::list_users).post(users::create_user))
        .route("/users/:id", get(users::get_user).delete(users::delete_user));

    // API v1 routes
    let api_v1 = Router::new()
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/auth/login", post(auth::login))
        .route("/auth/me", get(auth::me))
        .nest("/admin", admin);

    Router::new()
        .merge(catalog)
        .nest("/api/v1", api_v1)
        .with_state(state)
        .merge(openapi::create_openapi_router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
