//! Repository layer: store contracts and their backends
//!
//! Every entity has its own store trait. [`PgStore`] implements all of them
//! on PostgreSQL; [`MemoryStore`] implements them on in-process tables and
//! enforces the same referential rules (SET NULL, RESTRICT, CASCADE, unique
//! ISBN), so services behave identically on either backend.

pub mod authors;
pub mod books;
pub mod genres;
pub mod instances;
pub mod languages;
pub mod memory;
pub mod postgres;
pub mod users;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorInput},
        book::{Book, BookInput, BookRecord},
        instance::{InstanceInput, InstanceRecord, LoanStatus},
        listing::{Page, PageRequest},
        reference::{Genre, GenreInput, Language, LanguageInput},
        user::{NewUser, User},
    },
};

pub use memory::MemoryStore;
pub use postgres::PgStore;

/// Which copies an instance listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstanceFilter {
    All,
    /// Every copy currently on loan
    OnLoan,
    /// Copies on loan to one borrower
    BorrowedBy(i32),
}

impl InstanceFilter {
    pub fn status(&self) -> Option<LoanStatus> {
        match self {
            InstanceFilter::All => None,
            InstanceFilter::OnLoan | InstanceFilter::BorrowedBy(_) => Some(LoanStatus::OnLoan),
        }
    }

    pub fn borrower_id(&self) -> Option<i32> {
        match self {
            InstanceFilter::BorrowedBy(id) => Some(*id),
            _ => None,
        }
    }
}

/// Lending fields of a copy, written together by lend and return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Circulation {
    pub status: LoanStatus,
    pub due_back: Option<NaiveDate>,
    pub borrower_id: Option<i32>,
}

#[async_trait]
pub trait GenreStore: Send + Sync {
    /// Genres ordered by name, then id
    async fn list_genres(&self, request: PageRequest) -> AppResult<Page<Genre>>;

    async fn get_genre(&self, id: i32) -> AppResult<Genre>;

    /// Existing genres among `ids`; unknown ids are left out
    async fn find_genres(&self, ids: &[i32]) -> AppResult<Vec<Genre>>;

    async fn create_genre(&self, input: &GenreInput) -> AppResult<Genre>;

    async fn update_genre(&self, id: i32, input: &GenreInput) -> AppResult<Genre>;

    /// Deleting a genre removes it from every book's genre set
    async fn delete_genre(&self, id: i32) -> AppResult<()>;

    async fn count_genres(&self) -> AppResult<i64>;
}

#[async_trait]
pub trait LanguageStore: Send + Sync {
    /// Languages ordered by name, then id
    async fn list_languages(&self, request: PageRequest) -> AppResult<Page<Language>>;

    async fn get_language(&self, id: i32) -> AppResult<Language>;

    async fn create_language(&self, input: &LanguageInput) -> AppResult<Language>;

    async fn update_language(&self, id: i32, input: &LanguageInput) -> AppResult<Language>;

    /// Deleting a language clears it on its books
    async fn delete_language(&self, id: i32) -> AppResult<()>;
}

#[async_trait]
pub trait AuthorStore: Send + Sync {
    /// Authors ordered by last name, first name, then id
    async fn list_authors(&self, request: PageRequest) -> AppResult<Page<Author>>;

    async fn get_author(&self, id: i32) -> AppResult<Author>;

    async fn create_author(&self, input: &AuthorInput) -> AppResult<Author>;

    async fn update_author(&self, id: i32, input: &AuthorInput) -> AppResult<Author>;

    /// Deleting an author clears it on its books
    async fn delete_author(&self, id: i32) -> AppResult<()>;

    async fn count_authors(&self) -> AppResult<i64>;
}

#[async_trait]
pub trait BookStore: Send + Sync {
    /// Books ordered by title, then id
    async fn list_books(&self, request: PageRequest) -> AppResult<Page<BookRecord>>;

    async fn get_book(&self, id: i32) -> AppResult<BookRecord>;

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>>;

    /// Books of one author, title order
    async fn books_by_author(&self, author_id: i32) -> AppResult<Vec<Book>>;

    /// Fails with a field-level `unique` error on a duplicate ISBN
    async fn create_book(&self, input: &BookInput) -> AppResult<BookRecord>;

    async fn update_book(&self, id: i32, input: &BookInput) -> AppResult<BookRecord>;

    /// Fails with `Conflict` while copies of the book exist
    async fn delete_book(&self, id: i32) -> AppResult<()>;

    async fn count_books(&self) -> AppResult<i64>;

    /// Books whose title contains `needle` (case-sensitive)
    async fn count_books_with_title_containing(&self, needle: &str) -> AppResult<i64>;
}

#[async_trait]
pub trait InstanceStore: Send + Sync {
    /// Copies ordered by due date (undated last), then id
    async fn list_instances(
        &self,
        filter: InstanceFilter,
        request: PageRequest,
    ) -> AppResult<Page<InstanceRecord>>;

    async fn instances_of_book(&self, book_id: i32) -> AppResult<Vec<InstanceRecord>>;

    async fn get_instance(&self, id: Uuid) -> AppResult<InstanceRecord>;

    /// Inserts the copy under a freshly generated UUID
    async fn create_instance(&self, input: &InstanceInput) -> AppResult<InstanceRecord>;

    async fn update_instance(&self, id: Uuid, input: &InstanceInput) -> AppResult<InstanceRecord>;

    /// Writes only the due date, status and borrower are untouched
    async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<InstanceRecord>;

    async fn set_circulation(
        &self,
        id: Uuid,
        circulation: Circulation,
    ) -> AppResult<InstanceRecord>;

    async fn delete_instance(&self, id: Uuid) -> AppResult<()>;

    /// Count copies, optionally only those with `status`
    async fn count_instances(&self, status: Option<LoanStatus>) -> AppResult<i64>;

    async fn count_for_book(&self, book_id: i32) -> AppResult<i64>;
}

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn get_user(&self, id: i32) -> AppResult<User>;

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>>;

    /// Fails with a field-level `unique` error on a taken username
    async fn create_user(&self, user: &NewUser) -> AppResult<User>;

    async fn list_users(&self) -> AppResult<Vec<User>>;
}

#[async_trait]
pub trait MaintenanceStore: Send + Sync {
    /// Round-trip to the backend
    async fn ping(&self) -> AppResult<()>;

    /// Delete every catalog row (users are kept)
    async fn clear_catalog(&self) -> AppResult<()>;
}

/// Main repository struct holding one handle per store
#[derive(Clone)]
pub struct Repository {
    pub genres: Arc<dyn GenreStore>,
    pub languages: Arc<dyn LanguageStore>,
    pub authors: Arc<dyn AuthorStore>,
    pub books: Arc<dyn BookStore>,
    pub instances: Arc<dyn InstanceStore>,
    pub users: Arc<dyn UserStore>,
    pub maintenance: Arc<dyn MaintenanceStore>,
}

impl Repository {
    /// Repository backed by a PostgreSQL pool
    pub fn postgres(pool: Pool<Postgres>) -> Self {
        Self::from_store(Arc::new(PgStore::new(pool)))
    }

    /// Repository backed by fresh in-memory tables
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(MemoryStore::new()))
    }

    fn from_store<S>(store: Arc<S>) -> Self
    where
        S: GenreStore
            + LanguageStore
            + AuthorStore
            + BookStore
            + InstanceStore
            + UserStore
            + MaintenanceStore
            + 'static,
    {
        Self {
            genres: store.clone(),
            languages: store.clone(),
            authors: store.clone(),
            books: store.clone(),
            instances: store.clone(),
            users: store.clone(),
            maintenance: store,
        }
    }
}
