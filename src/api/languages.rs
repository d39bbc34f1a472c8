//! Language admin endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::language::{Language, LanguageInput},
};

use super::StaffUser;

/// List all languages
#[utoipa::path(
    get,
    path = "/api/v1/admin/languages",
    tag = "admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Language list", body = Vec<Language>)
    )
)]
pub async fn list_languages(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
) -> AppResult<Json<Vec<Language>>> {
    let rows = state.services.languages.list().await?;
    Ok(Json(rows))
}

/// Get language by ID
#[utoipa::path(
    get,
    path = "/api/v1/admin/languages/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Language ID")),
    responses(
        (status = 200, description = "Language details", body = Language),
        (status = 404, description = "Language not found")
    )
)]
pub async fn get_language(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Path(id): Path<i32>,
) -> AppResult<Json<Language>> {
    let row = state.services.languages.get(id).await?;
    Ok(Json(row))
}

/// Create language
#[utoipa::path(
    post,
    path = "/api/v1/admin/languages",
    tag = "admin",
    security(("bearer_auth" = [])),
    request_body = LanguageInput,
    responses(
        (status = 201, description = "Language created", body = Language),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Name already exists (case-insensitive)")
    )
)]
pub async fn create_language(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Json(data): Json<LanguageInput>,
) -> AppResult<(StatusCode, Json<Language>)> {
    let row = state.services.languages.create(data).await?;
    Ok((StatusCode::CREATED, Json(row)))
}

/// Update language
#[utoipa::path(
    put,
    path = "/api/v1/admin/languages/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Language ID")),
    request_body = LanguageInput,
    responses(
        (status = 200, description = "Language updated", body = Language),
        (status = 404, description = "Language not found"),
        (status = 409, description = "Name already exists (case-insensitive)")
    )
)]
pub async fn update_language(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Path(id): Path<i32>,
    Json(data): Json<LanguageInput>,
) -> AppResult<Json<Language>> {
    let row = state.services.languages.update(id, data).await?;
    Ok(Json(row))
}

/// Delete language
#[utoipa::path(
    delete,
    path = "/api/v1/admin/languages/{id}",
    tag = "admin",
    security(("bearer_auth" = [])),
    params(("id" = i32, Path, description = "Language ID")),
    responses(
        (status = 204, description = "Language deleted"),
        (status = 404, description = "Language not found")
    )
)]
pub async fn delete_language(
    State(state): State<crate::AppState>,
    _staff: StaffUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.languages.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
