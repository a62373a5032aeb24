//! Listing configuration: page size and sort order per entity

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::error::{AppError, AppResult};

/// Page size shared by every catalog listing
pub const PAGE_SIZE: i64 = 10;

/// Sort order of a listing.
///
/// Every ordering ends on the primary key so pages never overlap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ordering {
    /// Books: title, id
    Title,
    /// Authors: last name, first name, id
    LastNameFirstName,
    /// Genres and languages: name, id
    Name,
    /// Book instances: due date ascending with undated copies last, id
    DueBack,
}

impl Ordering {
    /// SQL `ORDER BY` body for this ordering; `prefix` is the table alias
    pub fn sql(&self, prefix: &str) -> String {
        let columns: &[&str] = match self {
            Ordering::Title => &["title", "id"],
            Ordering::LastNameFirstName => &["last_name", "first_name", "id"],
            Ordering::Name => &["name", "id"],
            Ordering::DueBack => &["due_back ASC NULLS LAST", "id"],
        };
        columns
            .iter()
            .map(|c| format!("{}.{}", prefix, c))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

/// Explicit listing metadata passed to store queries
#[derive(Debug, Clone, Copy)]
pub struct ListConfig {
    pub ordering: Ordering,
    pub page_size: i64,
}

pub const BOOK_LIST: ListConfig = ListConfig {
    ordering: Ordering::Title,
    page_size: PAGE_SIZE,
};

pub const AUTHOR_LIST: ListConfig = ListConfig {
    ordering: Ordering::LastNameFirstName,
    page_size: PAGE_SIZE,
};

pub const GENRE_LIST: ListConfig = ListConfig {
    ordering: Ordering::Name,
    page_size: PAGE_SIZE,
};

pub const LANGUAGE_LIST: ListConfig = ListConfig {
    ordering: Ordering::Name,
    page_size: PAGE_SIZE,
};

pub const INSTANCE_LIST: ListConfig = ListConfig {
    ordering: Ordering::DueBack,
    page_size: PAGE_SIZE,
};

/// `?page=N` query parameter (1-based)
#[derive(Debug, Clone, Copy, Default, Deserialize, IntoParams, ToSchema)]
pub struct PageQuery {
    pub page: Option<i64>,
}

/// A resolved page window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: i64,
    pub per_page: i64,
}

impl PageRequest {
    pub fn new(query: PageQuery, config: &ListConfig) -> AppResult<Self> {
        let page = query.page.unwrap_or(1);
        let per_page = config.page_size;
        let in_range = page
            .checked_sub(1)
            .and_then(|before| before.checked_mul(per_page))
            .is_some_and(|offset| offset >= 0);
        if !in_range {
            return Err(AppError::NotFound(format!("Invalid page ({})", page)));
        }
        Ok(Self {
            page,
            per_page,
        })
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.per_page)
    }

    /// Pages past the end are not found, except the first page of an empty set
    pub fn check_in_range(&self, total: i64) -> AppResult<()> {
        if self.page > 1 && self.offset() >= total {
            return Err(AppError::NotFound(format!("Invalid page ({})", self.page)));
        }
        Ok(())
    }
}

/// One page of a listing plus the total row count
#[derive(Debug, Clone, Serialize)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: i64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            per_page: request.per_page,
        }
    }

    pub fn num_pages(&self) -> i64 {
        if self.total == 0 {
            1
        } else {
            (self.total + self.per_page - 1) / self.per_page
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            per_page: self.per_page,
        }
    }
}

/// Slice an already-sorted in-memory set into a page
pub fn paginate<T: Clone>(sorted: &[T], request: PageRequest) -> Page<T> {
    let start = request.offset().max(0) as usize;
    let items = sorted
        .iter()
        .skip(start)
        .take(request.per_page as usize)
        .cloned()
        .collect();
    Page::new(items, sorted.len() as i64, request)
}
