//! Application router

use axum::{
    routing::{get, post},
    Router,
};
use time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tower_sessions::{cookie::SameSite, Expiry, MemoryStore, SessionManagerLayer};

use crate::{config::SessionConfig, AppState};

use super::{accounts, authors, books, genres, health, home, instances, languages, openapi};

/// Session cookies backing the home page visit counter
fn session_layer(config: &SessionConfig) -> SessionManagerLayer<MemoryStore> {
    SessionManagerLayer::new(MemoryStore::default())
        .with_secure(config.secure_cookies)
        .with_same_site(SameSite::Lax)
        .with_http_only(true)
        .with_expiry(Expiry::OnInactivity(Duration::days(config.inactivity_days)))
}

/// Create the application router with all routes
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let sessions = session_layer(&state.config.session);

    let catalog = Router::new()
        .route("/catalog/", get(home::index))
        // Books
        .route("/catalog/books/", get(books::list_books))
        .route("/catalog/book/create/", post(books::create_book))
        .route("/catalog/book/:id", get(books::get_book))
        .route(
            "/catalog/book/:id/update/",
            get(books::edit_book).post(books::update_book),
        )
        .route(
            "/catalog/book/:id/delete/",
            get(books::confirm_delete_book).post(books::delete_book),
        )
        .route(
            "/catalog/book/:id/renew/",
            get(instances::renewal_form).post(instances::renew_instance),
        )
        // Authors
        .route("/catalog/authors/", get(authors::list_authors))
        .route("/catalog/author/create/", post(authors::create_author))
        .route("/catalog/author/:id", get(authors::get_author))
        .route(
            "/catalog/author/:id/update/",
            get(authors::edit_author).post(authors::update_author),
        )
        .route(
            "/catalog/author/:id/delete/",
            get(authors::confirm_delete_author).post(authors::delete_author),
        )
        // Genres
        .route("/catalog/genres/", get(genres::list_genres))
        .route("/catalog/genre/create/", post(genres::create_genre))
        .route("/catalog/genre/:id", get(genres::get_genre))
        .route("/catalog/genre/:id/update/", post(genres::update_genre))
        .route("/catalog/genre/:id/delete/", post(genres::delete_genre))
        // Languages
        .route("/catalog/languages/", get(languages::list_languages))
        .route("/catalog/language/create/", post(languages::create_language))
        .route("/catalog/language/:id", get(languages::get_language))
        .route("/catalog/language/:id/update/", post(languages::update_language))
        .route("/catalog/language/:id/delete/", post(languages::delete_language))
        // Copies
        .route("/catalog/bookinstances/", get(instances::list_instances))
        .route("/catalog/bookinstance/create/", post(instances::create_instance))
        .route("/catalog/bookinstance/:id", get(instances::get_instance))
        .route(
            "/catalog/bookinstance/:id/update/",
            get(instances::edit_instance).post(instances::update_instance),
        )
        .route(
            "/catalog/bookinstance/:id/delete/",
            get(instances::confirm_delete_instance).post(instances::delete_instance),
        )
        .route("/catalog/bookinstance/:id/lend/", post(instances::lend_instance))
        .route("/catalog/bookinstance/:id/return/", post(instances::return_instance))
        // Circulation listings
        .route("/catalog/borrowed/", get(instances::all_borrowed))
        .route("/catalog/mybooks/", get(instances::my_borrowed));

    let app = Router::new()
        .route("/", get(home::root))
        .route("/health", get(health::health_check))
        .route("/ready", get(health::readiness_check))
        .route("/accounts/login/", post(accounts::login))
        .route("/accounts/me/", get(accounts::me))
        .merge(catalog)
        .with_state(state);

    app.merge(openapi::create_openapi_router())
        .layer(sessions)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
