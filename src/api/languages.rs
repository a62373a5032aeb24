//! Language endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        listing::PageQuery,
        reference::{Language, LanguageInput},
    },
    AppState,
};

use super::{AuthenticatedUser, PaginatedResponse};

/// List languages by name
#[utoipa::path(
    get,
    path = "/catalog/languages/",
    tag = "languages",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of languages", body = LanguagePage),
        (status = 404, description = "Page out of range")
    )
)]
pub async fn list_languages(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<Language>>> {
    let page = state.services.reference.list_languages(query).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/catalog/language/{id}",
    tag = "languages",
    params(
        ("id" = i32, Path, description = "Language ID")
    ),
    responses(
        (status = 200, description = "Language", body = Language),
        (status = 404, description = "Language not found")
    )
)]
pub async fn get_language(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Language>> {
    Ok(Json(state.services.reference.get_language(id).await?))
}

#[utoipa::path(
    post,
    path = "/catalog/language/create/",
    tag = "languages",
    security(("bearer_auth" = [])),
    request_body = LanguageInput,
    responses(
        (status = 201, description = "Language created", body = Language),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing can_affect_books")
    )
)]
pub async fn create_language(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(input): Json<LanguageInput>,
) -> AppResult<(StatusCode, Json<Language>)> {
    claims.require_affect_books()?;

    let created = state.services.reference.create_language(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    post,
    path = "/catalog/language/{id}/update/",
    tag = "languages",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Language ID")
    ),
    request_body = LanguageInput,
    responses(
        (status = 200, description = "Language updated", body = Language),
        (status = 403, description = "Missing can_affect_books"),
        (status = 404, description = "Language not found")
    )
)]
pub async fn update_language(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(input): Json<LanguageInput>,
) -> AppResult<Json<Language>> {
    claims.require_affect_books()?;

    let updated = state.services.reference.update_language(id, input).await?;
    Ok(Json(updated))
}

/// Delete a language; books written in it are kept without one
#[utoipa::path(
    post,
    path = "/catalog/language/{id}/delete/",
    tag = "languages",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Language ID")
    ),
    responses(
        (status = 204, description = "Language deleted"),
        (status = 403, description = "Missing can_affect_books"),
        (status = 404, description = "Language not found")
    )
)]
pub async fn delete_language(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_affect_books()?;

    state.services.reference.delete_language(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
