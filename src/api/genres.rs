//! Genre admin endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::genre::{Genre, GenreInput},
};

use super::StaffUser;

/// List all genres
#[utoipa::path(
    get,
    path = "/api/v1/admin/genres",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Genre list", body = Vec<Genre>)
    )
)]
pub async fn list_genres(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
) -> AppResult<Json<Vec<Genre>>> {
    let rows = state.services.genres.list().await?;
    Ok(Json(rows))
}

/// Get genre by ID
#[utoipa::path(
    get,
    path = "/api/v1/admin/genres/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 200, description = "Genre details", body = Genre),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn get_genre(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Genre>> {
    let row = state.services.genres.get(id).await?;
    Ok(Json(row))
}

/// Create genre
#[utoipa::path(
    post,
    path = "/api/v1/admin/genres",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = GenreInput,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Name already exists (case-insensitive)")
    )
)]
pub async fn create_genre(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Json(data): Json<GenreInput>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    let row = state.services.genres.create(data).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// Update genre
#[utoipa::path(
    put,
    path = "/api/v1/admin/genres/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Genre ID")),
    request_body = GenreInput,
    responses(
        (status = 200, description = "Genre updated", body = Genre),
        (status = 404, description = "Genre not found"),
        (status = 409, description = "Name already exists (case-insensitive)")
    )
)]
pub async fn update_genre(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Path(id): Path<i32>,
    Json(data): Json<GenreInput>,
) -> AppResult<Json<Genre>> {
    let row = state.services.genres.update(id, data).await?;
    Ok(Json(row))
}

/// Delete genre
#[utoipa::path(
    delete,
    path = "/api/v1/admin/genres/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Genre ID")),
    responses(
        (status = 204, description = "Genre deleted"),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn delete_genre(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.genres.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
