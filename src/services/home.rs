//! Home page dashboard service

use serde::Serialize;
use utoipa::ToSchema;

use crate::{error::AppResult, models::instance::LoanStatus, repository::Repository};

/// Substring counted by `num_books_with_and`
pub const TITLE_NEEDLE: &str = "and";

/// Catalog counters shown on the home page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct Dashboard {
    pub num_books: i64,
    pub num_instances: i64,
    /// Copies with status available
    pub num_instances_available: i64,
    pub num_authors: i64,
    pub num_genres: i64,
    /// Books whose title contains "and" (case-sensitive)
    pub num_books_with_and: i64,
    /// Visits earlier in this session
    pub num_visits: u64,
    pub is_authenticated: bool,
}

#[derive(Clone)]
pub struct HomeService {
    repository: Repository,
}

impl HomeService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Store round-trip for readiness checks
    pub async fn ping(&self) -> AppResult<()> {
        self.repository.maintenance.ping().await
    }

    pub async fn dashboard(&self, num_visits: u64, is_authenticated: bool) -> AppResult<Dashboard> {
        let books = &self.repository.books;
        let instances = &self.repository.instances;

        Ok(Dashboard {
            num_books: books.count_books().await?,
            num_instances: instances.count_instances(None).await?,
            num_instances_available: instances
                .count_instances(Some(LoanStatus::Available))
                .await?,
            num_authors: self.repository.authors.count_authors().await?,
            num_genres: self.repository.genres.count_genres().await?,
            num_books_with_and: books.count_books_with_title_containing(TITLE_NEEDLE).await?,
            num_visits,
            is_authenticated,
        })
    }
}
