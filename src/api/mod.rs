//! API handlers for the catalog endpoints

pub mod accounts;
pub mod authors;
pub mod books;
pub mod genres;
pub mod health;
pub mod home;
pub mod instances;
pub mod languages;
pub mod openapi;
pub mod router;

use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use serde::Serialize;
use utoipa::ToSchema;

use crate::{
    error::AppError,
    models::{
        author::AuthorView, book::BookView, instance::InstanceView, listing::Page,
        reference::{Genre, Language}, user::UserClaims,
    },
    AppState,
};

/// Path the renewal workflow redirects to on success
pub const BORROWED_PATH: &str = "/catalog/borrowed/";

/// Paginated response wrapper
#[derive(Serialize, ToSchema)]
#[aliases(
    BookPage = PaginatedResponse<BookView>,
    AuthorPage = PaginatedResponse<AuthorView>,
    GenrePage = PaginatedResponse<Genre>,
    LanguagePage = PaginatedResponse<Language>,
    InstancePage = PaginatedResponse<InstanceView>
)]
pub struct PaginatedResponse<T> {
    /// Entries of this page
    pub items: Vec<T>,
    /// Total number of entries
    pub total: i64,
    /// Current page number (1-based)
    pub page: i64,
    /// Entries per page
    pub per_page: i64,
    /// Number of pages (1 for an empty listing)
    pub num_pages: i64,
}

impl<T> From<Page<T>> for PaginatedResponse<T> {
    fn from(page: Page<T>) -> Self {
        Self {
            num_pages: page.num_pages(),
            items: page.items,
            total: page.total,
            page: page.page,
            per_page: page.per_page,
        }
    }
}

/// `Some(claims)` when a bearer token is present, `None` without one
fn bearer_claims(parts: &Parts, state: &AppState) -> Option<Result<UserClaims, AppError>> {
    let auth_header = parts
        .headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())?;

    // Check for Bearer token
    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return Some(Err(AppError::Authentication(
            "Invalid authorization header format".to_string(),
        )));
    };

    Some(
        UserClaims::from_token(token, &state.config.auth.jwt_secret)
            .map_err(|e| AppError::Authentication(e.to_string())),
    )
}

/// Extractor for authenticated user from JWT token
pub struct AuthenticatedUser(pub UserClaims);

#[async_trait]
impl FromRequestParts<AppState> for AuthenticatedUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts, state).ok_or_else(|| {
            AppError::Authentication("Missing authorization header".to_string())
        })??;
        Ok(AuthenticatedUser(claims))
    }
}

/// Extractor for endpoints open to anonymous callers; a malformed token is still rejected
pub struct OptionalUser(pub Option<UserClaims>);

#[async_trait]
impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let claims = bearer_claims(parts, state).transpose()?;
        Ok(OptionalUser(claims))
    }
}
