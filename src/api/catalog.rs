//! Public catalog pages: home, book list/detail, author list/detail

use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::{
    error::AppResult,
    models::{
        author::{AuthorDetail, AuthorListEntry},
        book::{BookDetail, BookListEntry},
        catalog::CatalogSummary,
    },
    repository::PageRequest,
};

use super::{AuthorPage, BookPage, PaginatedResponse};

/// Page selector of public lists (page size is fixed by configuration)
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number (default: 1)
    pub page: Option<i64>,
}

impl PageQuery {
    fn page_request(&self, state: &crate::AppState) -> PageRequest {
        let size = state.config.catalog.page_size;
        PageRequest::new(self.page, Some(size), size, size)
    }
}

/// Catalog home page
#[utoipa::path(
    get,
    path = "/",
    tag = "catalog",
    responses(
        (status = 200, description = "Catalog record counts", body = CatalogSummary)
    )
)]
pub async fn index(State(state): State<crate::AppState>) -> AppResult<Json<CatalogSummary>> {
    let summary = state.services.catalog.index().await?;
    Ok(Json(summary))
}

/// List books ordered by title, then author
#[utoipa::path(
    get,
    path = "/books/",
    tag = "catalog",
    params(PageQuery),
    responses(
        (status = 200, description = "Books", body = BookPage)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<BookListEntry>>> {
    let page = query.page_request(&state);
    let (books, total) = state.services.books.list(page).await?;
    Ok(Json(PaginatedResponse::new(books, total, page)))
}

/// Book detail
#[utoipa::path(
    get,
    path = "/books/{id}",
    tag = "catalog",
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetail),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetail>> {
    let book = state.services.books.get_detail(id).await?;
    Ok(Json(book))
}

/// List authors ordered by last name, then first name
#[utoipa::path(
    get,
    path = "/authors/",
    tag = "catalog",
    params(PageQuery),
    responses(
        (status = 200, description = "Authors", body = AuthorPage)
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<AuthorListEntry>>> {
    let page = query.page_request(&state);
    let (authors, total) = state.services.authors.list(page).await?;
    Ok(Json(PaginatedResponse::new(authors, total, page)))
}

/// Author detail with their books
#[utoipa::path(
    get,
    path = "/authors/{id}",
    tag = "catalog",
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDetail),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetail>> {
    let author = state.services.authors.get_detail(id).await?;
    Ok(Json(author))
}
