//! OpenAPI documentation

use axum::Router;
use utoipa::{
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::{accounts, authors, books, genres, health, home, instances, languages};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Library Catalog API",
        version = "1.0.0",
        description = "Books, authors, copies and their circulation"
    ),
    paths(
        // Health
        health::health_check,
        health::readiness_check,
        // Accounts
        accounts::login,
        accounts::me,
        // Home
        home::index,
        // Books
        books::list_books,
        books::get_book,
        books::create_book,
        books::edit_book,
        books::update_book,
        books::confirm_delete_book,
        books::delete_book,
        // Authors
        authors::list_authors,
        authors::get_author,
        authors::create_author,
        authors::edit_author,
        authors::update_author,
        authors::confirm_delete_author,
        authors::delete_author,
        // Genres
        genres::list_genres,
        genres::get_genre,
        genres::create_genre,
        genres::update_genre,
        genres::delete_genre,
        // Languages
        languages::list_languages,
        languages::get_language,
        languages::create_language,
        languages::update_language,
        languages::delete_language,
        // Copies
        instances::list_instances,
        instances::get_instance,
        instances::create_instance,
        instances::edit_instance,
        instances::update_instance,
        instances::confirm_delete_instance,
        instances::delete_instance,
        // Circulation
        instances::renewal_form,
        instances::renew_instance,
        instances::lend_instance,
        instances::return_instance,
        instances::all_borrowed,
        instances::my_borrowed,
    ),
    components(
        schemas(
            // Accounts
            accounts::LoginRequest,
            accounts::LoginResponse,
            accounts::UserInfo,
            crate::models::user::Permission,
            crate::models::user::UserRef,
            // Catalog
            crate::models::links::Links,
            crate::models::author::Author,
            crate::models::author::AuthorInput,
            crate::models::author::AuthorView,
            crate::models::author::AuthorDetail,
            crate::models::author::AuthorRef,
            crate::models::book::BookInput,
            crate::models::book::BookView,
            crate::models::book::BookDetail,
            crate::models::book::BookRef,
            crate::models::reference::Genre,
            crate::models::reference::GenreInput,
            crate::models::reference::Language,
            crate::models::reference::LanguageInput,
            // Copies
            crate::models::instance::LoanStatus,
            crate::models::instance::InstanceInput,
            crate::models::instance::InstanceView,
            crate::models::instance::RenewalForm,
            crate::models::instance::RenewalFormView,
            crate::models::instance::LendForm,
            instances::RenewalRejection,
            // Listings
            crate::models::listing::PageQuery,
            crate::api::BookPage,
            crate::api::AuthorPage,
            crate::api::GenrePage,
            crate::api::LanguagePage,
            crate::api::InstancePage,
            // Home
            crate::services::home::Dashboard,
            // Health
            health::HealthResponse,
            // Errors
            crate::error::ErrorResponse,
            crate::error::FieldError,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "accounts", description = "Sign-in"),
        (name = "catalog", description = "Home page"),
        (name = "books", description = "Book management"),
        (name = "authors", description = "Author management"),
        (name = "genres", description = "Genre management"),
        (name = "languages", description = "Language management"),
        (name = "instances", description = "Copy management"),
        (name = "circulation", description = "Lending, renewal and return")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Create the OpenAPI documentation router
pub fn create_openapi_router() -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
}
