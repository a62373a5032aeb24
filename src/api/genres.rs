//! Genre endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::{
    error::AppResult,
    models::{
        listing::PageQuery,
        reference::{Genre, GenreInput},
    },
    AppState,
};

use super::{AuthenticatedUser, PaginatedResponse};

/// List genres by name
#[utoipa::path(
    get,
    path = "/catalog/genres/",
    tag = "genres",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of genres", body = GenrePage),
        (status = 404, description = "Page out of range")
    )
)]
pub async fn list_genres(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<Genre>>> {
    let page = state.services.reference.list_genres(query).await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/catalog/genre/{id}",
    tag = "genres",
    params(
        ("id" = i32, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre", body = Genre),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn get_genre(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<Genre>> {
    Ok(Json(state.services.reference.get_genre(id).await?))
}

#[utoipa::path(
    post,
    path = "/catalog/genre/create/",
    tag = "genres",
    security(("bearer_auth" = [])),
    request_body = GenreInput,
    responses(
        (status = 201, description = "Genre created", body = Genre),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing can_affect_books")
    )
)]
pub async fn create_genre(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(input): Json<GenreInput>,
) -> AppResult<(StatusCode, Json<Genre>)> {
    claims.require_affect_books()?;

    let created = state.services.reference.create_genre(input).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/update/",
    tag = "genres",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Genre ID")
    ),
    request_body = GenreInput,
    responses(
        (status = 200, description = "Genre updated", body = Genre),
        (status = 403, description = "Missing can_affect_books"),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn update_genre(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(input): Json<GenreInput>,
) -> AppResult<Json<Genre>> {
    claims.require_affect_books()?;

    let updated = state.services.reference.update_genre(id, input).await?;
    Ok(Json(updated))
}

/// Delete a genre; it is removed from every book
#[utoipa::path(
    post,
    path = "/catalog/genre/{id}/delete/",
    tag = "genres",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Genre ID")
    ),
    responses(
        (status = 204, description = "Genre deleted"),
        (status = 403, description = "Missing can_affect_books"),
        (status = 404, description = "Genre not found")
    )
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    claims.require_affect_books()?;

    state.services.reference.delete_genre(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
