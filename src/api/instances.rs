//! Book instance (copy) endpoints and circulation workflows

use std::collections::BTreeMap;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{
    error::{field_errors, AppError, AppResult, ErrorCode, FieldError},
    models::{
        instance::{today, InstanceInput, InstanceView, LendForm, RenewalForm, RenewalFormView},
        listing::PageQuery,
    },
    AppState,
};

use super::{AuthenticatedUser, PaginatedResponse, BORROWED_PATH};

/// Renewal rejected: the field errors plus the form to present again
#[derive(Serialize, ToSchema)]
pub struct RenewalRejection {
    pub code: u32,
    pub error: String,
    pub message: String,
    pub fields: BTreeMap<String, Vec<FieldError>>,
    pub form: RenewalFormView,
}

/// List every copy, soonest due first
#[utoipa::path(
    get,
    path = "/catalog/bookinstances/",
    tag = "instances",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of copies", body = InstancePage),
        (status = 404, description = "Page out of range")
    )
)]
pub async fn list_instances(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<InstanceView>>> {
    let page = state
        .services
        .circulation
        .list_instances(query, today())
        .await?;
    Ok(Json(page.into()))
}

#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}",
    tag = "instances",
    params(
        ("id" = Uuid, Path, description = "Copy UUID")
    ),
    responses(
        (status = 200, description = "Copy details", body = InstanceView),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn get_instance(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<InstanceView>> {
    let instance = state.services.circulation.get_instance(id, today()).await?;
    Ok(Json(instance))
}

#[utoipa::path(
    post,
    path = "/catalog/bookinstance/create/",
    tag = "instances",
    security(("bearer_auth" = [])),
    request_body = InstanceInput,
    responses(
        (status = 201, description = "Copy created", body = InstanceView),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing can_affect_books")
    )
)]
pub async fn create_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(input): Json<InstanceInput>,
) -> AppResult<(StatusCode, Json<InstanceView>)> {
    claims.require_affect_books()?;

    let created = state
        .services
        .circulation
        .create_instance(input, today())
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/update/",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy UUID")
    ),
    responses(
        (status = 200, description = "Form values", body = InstanceInput),
        (status = 403, description = "Missing can_affect_books"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn edit_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<InstanceInput>> {
    claims.require_affect_books()?;

    Ok(Json(state.services.circulation.instance_form(id).await?))
}

#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/update/",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy UUID")
    ),
    request_body = InstanceInput,
    responses(
        (status = 200, description = "Copy updated", body = InstanceView),
        (status = 400, description = "Invalid form", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing can_affect_books"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn update_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(input): Json<InstanceInput>,
) -> AppResult<Json<InstanceView>> {
    claims.require_affect_books()?;

    let updated = state
        .services
        .circulation
        .update_instance(id, input, today())
        .await?;
    Ok(Json(updated))
}

#[utoipa::path(
    get,
    path = "/catalog/bookinstance/{id}/delete/",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy UUID")
    ),
    responses(
        (status = 200, description = "Copy to delete", body = InstanceView),
        (status = 403, description = "Missing can_affect_books"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn confirm_delete_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<InstanceView>> {
    claims.require_affect_books()?;

    Ok(Json(state.services.circulation.get_instance(id, today()).await?))
}

#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/delete/",
    tag = "instances",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy UUID")
    ),
    responses(
        (status = 204, description = "Copy deleted"),
        (status = 403, description = "Missing can_affect_books"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn delete_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<StatusCode> {
    claims.require_affect_books()?;

    state.services.circulation.delete_instance(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Renewal form with the proposed date (three weeks from today)
#[utoipa::path(
    get,
    path = "/catalog/book/{id}/renew/",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy UUID")
    ),
    responses(
        (status = 200, description = "Renewal form", body = RenewalFormView),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing can_mark_returned"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn renewal_form(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<RenewalFormView>> {
    claims.require_mark_returned()?;

    let form = state.services.circulation.renewal_form(id, today()).await?;
    Ok(Json(form))
}

/// Renew a copy; redirects to the borrowed listing on success
#[utoipa::path(
    post,
    path = "/catalog/book/{id}/renew/",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy UUID")
    ),
    request_body = RenewalForm,
    responses(
        (status = 303, description = "Renewed, see the borrowed listing"),
        (status = 400, description = "Date outside [today, today + 4 weeks]", body = RenewalRejection),
        (status = 403, description = "Missing can_mark_returned"),
        (status = 404, description = "Copy not found"),
        (status = 409, description = "Copy is not on loan")
    )
)]
pub async fn renew_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(form): Json<RenewalForm>,
) -> AppResult<Response> {
    claims.require_mark_returned()?;

    let today = today();
    match state.services.circulation.renew(id, form, today).await {
        Ok(_) => Ok(Redirect::to(BORROWED_PATH).into_response()),
        Err(AppError::InvalidInput(errors)) => {
            let form = state.services.circulation.renewal_form(id, today).await?;
            let body = RenewalRejection {
                code: ErrorCode::InvalidForm as u32,
                error: format!("{:?}", ErrorCode::InvalidForm),
                message: "Submitted form is invalid".to_string(),
                fields: field_errors(&errors),
                form,
            };
            Ok((StatusCode::BAD_REQUEST, Json(body)).into_response())
        }
        Err(e) => Err(e),
    }
}

/// Lend a copy to a borrower
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/lend/",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy UUID")
    ),
    request_body = LendForm,
    responses(
        (status = 200, description = "Copy on loan", body = InstanceView),
        (status = 400, description = "Unknown borrower or due date out of range", body = crate::error::ErrorResponse),
        (status = 403, description = "Missing can_mark_returned"),
        (status = 404, description = "Copy not found"),
        (status = 409, description = "Copy already on loan")
    )
)]
pub async fn lend_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(form): Json<LendForm>,
) -> AppResult<Json<InstanceView>> {
    claims.require_mark_returned()?;

    let lent = state.services.circulation.lend(id, form, today()).await?;
    Ok(Json(lent))
}

/// Set book as returned
#[utoipa::path(
    post,
    path = "/catalog/bookinstance/{id}/return/",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Copy UUID")
    ),
    responses(
        (status = 200, description = "Copy available again", body = InstanceView),
        (status = 403, description = "Missing can_mark_returned"),
        (status = 404, description = "Copy not found")
    )
)]
pub async fn return_instance(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<InstanceView>> {
    claims.require_mark_returned()?;

    let returned = state
        .services
        .circulation
        .return_instance(id, today())
        .await?;
    Ok(Json(returned))
}

/// Every copy on loan, soonest due first
#[utoipa::path(
    get,
    path = "/catalog/borrowed/",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Copies on loan", body = InstancePage),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Missing view_all_borrowed")
    )
)]
pub async fn all_borrowed(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<InstanceView>>> {
    claims.require_view_all_borrowed()?;

    let page = state
        .services
        .circulation
        .all_borrowed(query, today())
        .await?;
    Ok(Json(page.into()))
}

/// Copies on loan to the caller
#[utoipa::path(
    get,
    path = "/catalog/mybooks/",
    tag = "circulation",
    security(("bearer_auth" = [])),
    params(PageQuery),
    responses(
        (status = 200, description = "Caller's copies on loan", body = InstancePage),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn my_borrowed(
    State(state): State<AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Query(query): Query<PageQuery>,
) -> AppResult<Json<PaginatedResponse<InstanceView>>> {
    let page = state
        .services
        .circulation
        .borrowed_by(claims.user_id, query, today())
        .await?;
    Ok(Json(page.into()))
}
