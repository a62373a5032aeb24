//! Book (catalog entry) model and related types

use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use validator::Validate;

use super::{
    author::{Author, AuthorRef},
    instance::InstanceView,
    links::Links,
    reference::{Genre, Language},
};

/// How many genre names `display_genre` shows
pub const DISPLAY_GENRE_COUNT: usize = 3;

/// Book row: the abstract work, not a physical copy
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Book {
    pub id: i32,
    pub title: String,
    pub summary: String,
    /// 13 character ISBN, unique across the catalog
    pub isbn: String,
    pub author_id: Option<i32>,
    pub language_id: Option<i32>,
}

impl Book {
    pub fn links(&self) -> Links {
        Links::for_entity("book", self.id)
    }
}

impl std::fmt::Display for Book {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.title)
    }
}

/// A book with its author, language and genres resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookRecord {
    pub book: Book,
    pub author: Option<Author>,
    pub language: Option<Language>,
    pub genres: Vec<Genre>,
}

/// Names of the first three genres, alphabetically, joined with ", "
pub fn display_genre(genres: &[Genre]) -> String {
    let mut sorted: Vec<&Genre> = genres.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
    sorted
        .iter()
        .take(DISPLAY_GENRE_COUNT)
        .map(|g| g.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Create / update book form
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct BookInput {
    #[validate(length(min = 1, max = 200, message = "Title must be 1 to 200 characters"))]
    pub title: String,
    #[validate(length(min = 1, max = 1000, message = "Summary must be 1 to 1000 characters"))]
    pub summary: String,
    #[validate(length(min = 1, max = 13, message = "ISBN must be 1 to 13 characters"))]
    pub isbn: String,
    pub author_id: Option<i32>,
    pub language_id: Option<i32>,
    #[serde(default)]
    pub genre_ids: Vec<i32>,
}

impl From<BookRecord> for BookInput {
    fn from(record: BookRecord) -> Self {
        Self {
            title: record.book.title,
            summary: record.book.summary,
            isbn: record.book.isbn,
            author_id: record.book.author_id,
            language_id: record.book.language_id,
            genre_ids: record.genres.iter().map(|g| g.id).collect(),
        }
    }
}

/// Short book reference embedded in author and copy views
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct BookRef {
    pub id: i32,
    pub title: String,
    pub url: String,
}

impl From<&Book> for BookRef {
    fn from(book: &Book) -> Self {
        Self {
            id: book.id,
            title: book.title.clone(),
            url: book.links().detail,
        }
    }
}

/// Book as returned by list endpoints
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookView {
    pub id: i32,
    pub title: String,
    pub summary: String,
    pub isbn: String,
    pub author: Option<AuthorRef>,
    pub language: Option<Language>,
    pub genres: Vec<Genre>,
    pub display_genre: String,
    pub links: Links,
}

impl From<BookRecord> for BookView {
    fn from(record: BookRecord) -> Self {
        let BookRecord {
            book,
            author,
            language,
            genres,
        } = record;

        Self {
            display_genre: display_genre(&genres),
            links: book.links(),
            author: author.as_ref().map(AuthorRef::from),
            id: book.id,
            title: book.title,
            summary: book.summary,
            isbn: book.isbn,
            language,
            genres,
        }
    }
}

/// Book with its circulating copies
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct BookDetail {
    #[serde(flatten)]
    pub book: BookView,
    pub instances: Vec<InstanceView>,
}
