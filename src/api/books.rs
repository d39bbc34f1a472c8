//! Book admin endpoints, including the inline instance editor

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        book::{BookDetail, BookInput, BookListEntry},
        book_instance::{BookInstanceDetail, BookInstanceListEntry, InlineBookInstanceInput},
    },
};

use super::{BookPage, ListQuery, PaginatedResponse, StaffUser};

/// List books (columns: title, author, genre)
#[utoipa::path(
    get,
    path = "/api/v1/admin/books",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(ListQuery),
    responses(
        (status = 200, description = "Book list", body = BookPage)
    )
)]
pub async fn list_books(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<PaginatedResponse<BookListEntry>>> {
    let page = query.page_request(&state);
    let (books, total) = state.services.books.list(page).await?;
    Ok(Json(PaginatedResponse::new(books, total, page)))
}

/// Get book with genres and instances
#[utoipa::path(
    get,
    path = "/api/v1/admin/books/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Book details", body = BookDetail),
        (status = 404, description = "Book not found")
    )
)]
pub async fn get_book(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BookDetail>> {
    let book = state.services.books.get_detail(id).await?;
    Ok(Json(book))
}

/// Create book
#[utoipa::path(
    post,
    path = "/api/v1/admin/books",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = BookInput,
    responses(
        (status = 201, description = "Book created", body = BookDetail),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "ISBN already exists")
    )
)]
pub async fn create_book(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Json(data): Json<BookInput>,
) -> AppResult<(StatusCode, Json<BookDetail>)> {
    let book = state.services.books.create(data).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

/// Update book
#[utoipa::path(
    put,
    path = "/api/v1/admin/books/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = BookInput,
    responses(
        (status = 200, description = "Book updated", body = BookDetail),
        (status = 400, description = "Invalid input"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "ISBN already exists")
    )
)]
pub async fn update_book(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Path(id): Path<i32>,
    Json(data): Json<BookInput>,
) -> AppResult<Json<BookDetail>> {
    let book = state.services.books.update(id, data).await?;
    Ok(Json(book))
}

/// Delete book
#[utoipa::path(
    delete,
    path = "/api/v1/admin/books/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "Book not found"),
        (status = 409, description = "Book still has instances")
    )
)]
pub async fn delete_book(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.books.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// List the instances of a book
#[utoipa::path(
    get,
    path = "/api/v1/admin/books/{id}/instances",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    responses(
        (status = 200, description = "Instances of the book", body = Vec<BookInstanceListEntry>),
        (status = 404, description = "Book not found")
    )
)]
pub async fn list_book_instances(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Vec<BookInstanceListEntry>>> {
    let instances = state.services.books.list_instances(id).await?;
    Ok(Json(instances))
}

/// Create an instance of a book
#[utoipa::path(
    post,
    path = "/api/v1/admin/books/{id}/instances",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Book ID")),
    request_body = InlineBookInstanceInput,
    responses(
        (status = 201, description = "Instance created", body = BookInstanceDetail),
        (status = 404, description = "Book not found")
    )
)]
pub async fn create_book_instance(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Path(id): Path<i32>,
    Json(data): Json<InlineBookInstanceInput>,
) -> AppResult<(StatusCode, Json<BookInstanceDetail>)> {
    let instance = state.services.book_instances.create_for_book(id, data).await?;
    Ok((StatusCode::CREATED, Json(instance)))
}
