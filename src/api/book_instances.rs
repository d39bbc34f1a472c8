//! Book instance admin endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::book_instance::{
        BookInstanceDetail, BookInstanceInput, BookInstanceListEntry, BookInstanceQuery,
    },
    repository::PageRequest,
};

use super::{BookInstancePage, PaginatedResponse, StaffUser};

/// List instances (columns: status, due back, id), filterable by status and due date
#[utoipa::path(
    get,
    path = "/api/v1/admin/bookinstances",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(BookInstanceQuery),
    responses(
        (status = 200, description = "Instance list", body = BookInstancePage)
    )
)]
pub async fn list_book_instances(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Query(query): Query<BookInstanceQuery>,
) -> AppResult<Json<PaginatedResponse<BookInstanceListEntry>>> {
    let page = PageRequest::new(
        query.page,
        query.per_page,
        state.config.catalog.page_size,
        state.config.catalog.max_page_size,
    );
    let (instances, total) = state.services.book_instances.list(&query, page).await?;
    Ok(Json(PaginatedResponse::new(instances, total, page)))
}

/// Get instance, grouped into general and availability fieldsets
#[utoipa::path(
    get,
    path = "/api/v1/admin/bookinstances/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Instance ID")),
    responses(
        (status = 200, description = "Instance details", body = BookInstanceDetail),
        (status = 404, description = "Instance not found")
    )
)]
pub async fn get_book_instance(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<BookInstanceDetail>> {
    let instance = state.services.book_instances.get_detail(id).await?;
    Ok(Json(instance))
}

/// Create instance
#[utoipa::path(
    post,
    path = "/api/v1/admin/bookinstances",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = BookInstanceInput,
    responses(
        (status = 201, description = "Instance created", body = BookInstanceDetail),
        (status = 400, description = "Invalid input or unknown book/borrower")
    )
)]
pub async fn create_book_instance(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Json(data): Json<BookInstanceInput>,
) -> AppResult<(StatusCode, Json<BookInstanceDetail>)> {
    let instance = state.services.book_instances.create(data).await?;
    Ok((StatusCode::CREATED, Json(instance)))
}

/// Update instance
#[utoipa::path(
    put,
    path = "/api/v1/admin/bookinstances/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Instance ID")),
    request_body = BookInstanceInput,
    responses(
        (status = 200, description = "Instance updated", body = BookInstanceDetail),
        (status = 404, description = "Instance not found")
    )
)]
pub async fn update_book_instance(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Path(id): Path<Uuid>,
    Json(data): Json<BookInstanceInput>,
) -> AppResult<Json<BookInstanceDetail>> {
    let instance = state.services.book_instances.update(id, data).await?;
    Ok(Json(instance))
}

/// Delete instance
#[utoipa::path(
    delete,
    path = "/api/v1/admin/bookinstances/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Instance ID")),
    responses(
        (status = 204, description = "Instance deleted"),
        (status = 404, description = "Instance not found")
    )
)]
pub async fn delete_book_instance(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    state.services.book_instances.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
