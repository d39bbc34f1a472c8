//! Author admin endpoints, including the inline book editor

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorDetail, AuthorInput, AuthorListEntry},
        book::{BookDetail, BookInput, BookListEntry},
    },
};

use super::{AuthorPage, ListQuery, PaginatedResponse, StaffUser};

/// List authors (columns: last name, first name, birth, death)
#[utoipa::path(
    get,
    path = "/api/v1/admin/authors",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Author list", body = AuthorPage)
    )
)]
pub async fn list_authors(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PaginatedResponse<AuthorListEntry>>> {
    let page = query.page_request(&state);
    let (authors, total) = state.services.authors.list(page).await?;
    Ok(Json(PaginatedResponse::new(authors, total, page)))
}

/// Get author with their books
#[utoipa::path(
    get,
    path = "/api/v1/admin/authors/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Author details", body = AuthorDetail),
        (status = 404, description = "Author not found")
    )
)]
pub async fn get_author(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Path(id): Path<i32>,
) -> AppResult<Json<AuthorDetail>> {
    let author = state.services.authors.get_detail(id).await?;
    Ok(Json(author))
}

/// Create author
#[utoipa::path(
    post,
    path = "/api/v1/admin/authors",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = AuthorInput,
    responses(
        (status = 201, description = "Author created", body = Author),
        (status = 400, description = "Invalid input")
    )
)]
pub async fn create_author(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Json(data): Json<AuthorInput>,
) -> AppResult<(StatusCode, Json<Author>)> {
    let author = state.services.authors.create(data).await?;
    Ok((StatusCode::CREATED, Json(author)))
}

/// Update author
#[utoipa::path(
    put,
    path = "/api/v1/admin/authors/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body = AuthorInput,
    responses(
        (status = 200, description = "Author updated", body = Author),
        (status = 404, description = "Author not found")
    )
)]
pub async fn update_author(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Path(id): Path<i32>,
    Json(data): Json<AuthorInput>,
) -> AppResult<Json<Author>> {
    let author = state.services.authors.update(id, data).await?;
    Ok(Json(author))
}

/// Delete author
#[utoipa::path(
    delete,
    path = "/api/v1/admin/authors/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 204, description = "Author deleted"),
        (status = 404, description = "Author not found"),
        (status = 409, description = "Author still has books")
    )
)]
pub async fn delete_author(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.authors.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the books of an author
#[utoipa::path(
    get,
    path = "/api/v1/admin/authors/{id}/books",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    responses(
        (status = 200, description = "Books of the author", body = Vec<BookListEntry>),
        (status = 404, description = "Author not found")
    )
)]
pub async fn list_author_books(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<BookListEntry>>> {
    let books = state.services.books.list_by_author(id).await?;
    Ok(Json(books))
}

/// Create a book for an author
#[utoipa::path(
    post,
    path = "/api/v1/admin/authors/{id}/books",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Author ID")),
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = BookDetail),
        (status = 404, description = "Author not found"),
        (status = 409, description = "ISBN already exists")
    )
)]
pub async fn create_author_book(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Path(id): Path<i32>,
    Json(data): Json<BookInput>,
) -> AppResult<(StatusCode, Json<BookDetail>)> {
    let book = state.services.books.create_for_author(id, data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}
