//! Home page and root redirect

use axum::{extract::State, response::Redirect, Json};
use tower_sessions::Session;

use crate::{
    error::AppResult,
    models::session::SessionVisits,
    services::home::Dashboard,
    AppState,
};

use super::OptionalUser;

/// Catalog dashboard: counters, session visits and sign-in state
#[utoipa::path(
    get,
    path = "/catalog/",
    tag = "catalog",
    responses(
        (status = 200, description = "Dashboard counters", body = Dashboard)
    )
)]
pub async fn index(
    State(state): State<AppState>,
    OptionalUser(claims): OptionalUser,
    session: Session,
) -> AppResult<Json<Dashboard>> {
    let num_visits = SessionVisits::record(&session).await?;

    let dashboard = state
        .services
        .home
        .dashboard(num_visits, claims.is_some())
        .await?;
    Ok(Json(dashboard))
}

/// `/` lands on the catalog
pub async fn root() -> Redirect {
    Redirect::permanent("/catalog/")
}
