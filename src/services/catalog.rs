//! Catalog service: books and authors

use std::collections::BTreeSet;

use validator::{Validate, ValidationErrors};

use super::exists;
use crate::{
    error::{field_error, AppError, AppResult},
    models::{
        author::{AuthorDetail, AuthorInput, AuthorView},
        book::{BookDetail, BookInput, BookRef, BookView},
        instance::{today, InstanceView},
        listing::{Page, PageQuery, PageRequest, AUTHOR_LIST, BOOK_LIST},
    },
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    // Books

    /// List books, title order, ten per page
    pub async fn list_books(&self, query: PageQuery) -> AppResult<Page<BookView>> {
        let request = PageRequest::new(query, &BOOK_LIST)?;
        let page = self.repository.books.list_books(request).await?;
        request.check_in_range(page.total)?;
        Ok(page.map(BookView::from))
    }

    /// Book with author, language, genres and copies
    pub async fn get_book(&self, id: i32) -> AppResult<BookDetail> {
        let record = self.repository.books.get_book(id).await?;
        let today = today();
        let instances = self
            .repository
            .instances
            .instances_of_book(id)
            .await?
            .into_iter()
            .map(|r| InstanceView::new(r, today))
            .collect();

        tracing::debug!("Loaded book {} with its copies", id);
        Ok(BookDetail {
            book: record.into(),
            instances,
        })
    }

    /// Current form values of a book
    pub async fn book_form(&self, id: i32) -> AppResult<BookInput> {
        Ok(self.repository.books.get_book(id).await?.into())
    }

    /// Book as shown on the delete confirmation
    pub async fn book_summary(&self, id: i32) -> AppResult<BookView> {
        Ok(self.repository.books.get_book(id).await?.into())
    }

    pub async fn create_book(&self, input: BookInput) -> AppResult<BookView> {
        self.check_book_input(&input, None).await?;

        let record = self.repository.books.create_book(&input).await?;
        tracing::info!("Created book {} ({})", record.book.title, record.book.id);
        Ok(record.into())
    }

    pub async fn update_book(&self, id: i32, input: BookInput) -> AppResult<BookView> {
        // 404 before form errors
        self.repository.books.get_book(id).await?;
        self.check_book_input(&input, Some(id)).await?;

        let record = self.repository.books.update_book(id, &input).await?;
        tracing::info!("Updated book {}", id);
        Ok(record.into())
    }

    /// Delete a book; rejected while copies of it exist
    pub async fn delete_book(&self, id: i32) -> AppResult<()> {
        self.repository.books.get_book(id).await?;

        let copies = self.repository.instances.count_for_book(id).await?;
        if copies > 0 {
            tracing::warn!("Refusing to delete book {} with {} copies", id, copies);
            return Err(AppError::Conflict(format!(
                "Book {} still has {} copies; delete them first",
                id, copies
            )));
        }

        self.repository.books.delete_book(id).await?;
        tracing::info!("Deleted book {}", id);
        Ok(())
    }

    /// Field-level checks: lengths, referenced rows and ISBN uniqueness
    async fn check_book_input(&self, input: &BookInput, book_id: Option<i32>) -> AppResult<()> {
        let mut errors = match input.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(errors) => errors,
        };

        if let Some(author_id) = input.author_id {
            if !exists(self.repository.authors.get_author(author_id).await)? {
                errors.add(
                    "author_id",
                    field_error("does_not_exist", format!("Author {} does not exist", author_id)),
                );
            }
        }

        if let Some(language_id) = input.language_id {
            if !exists(self.repository.languages.get_language(language_id).await)? {
                errors.add(
                    "language_id",
                    field_error(
                        "does_not_exist",
                        format!("Language {} does not exist", language_id),
                    ),
                );
            }
        }

        let requested: BTreeSet<i32> = input.genre_ids.iter().copied().collect();
        if !requested.is_empty() {
            let ids: Vec<i32> = requested.iter().copied().collect();
            let found = self.repository.genres.find_genres(&ids).await?;
            if found.len() != requested.len() {
                let missing: Vec<String> = requested
                    .iter()
                    .filter(|id| !found.iter().any(|g| g.id == **id))
                    .map(|id| id.to_string())
                    .collect();
                errors.add(
                    "genre_ids",
                    field_error(
                        "does_not_exist",
                        format!("Unknown genres: {}", missing.join(", ")),
                    ),
                );
            }
        }

        if let Some(existing) = self.repository.books.find_by_isbn(&input.isbn).await? {
            if Some(existing.id) != book_id {
                errors.add(
                    "isbn",
                    field_error("unique", "Book with this ISBN already exists."),
                );
            }
        }

        if errors.errors().is_empty() {
            Ok(())
        } else {
            Err(errors.into())
        }
    }

    // Authors

    /// List authors, last name then first name, ten per page
    pub async fn list_authors(&self, query: PageQuery) -> AppResult<Page<AuthorView>> {
        let request = PageRequest::new(query, &AUTHOR_LIST)?;
        let page = self.repository.authors.list_authors(request).await?;
        request.check_in_range(page.total)?;
        Ok(page.map(AuthorView::from))
    }

    /// Author with their books
    pub async fn get_author(&self, id: i32) -> AppResult<AuthorDetail> {
        let author = self.repository.authors.get_author(id).await?;
        let books = self
            .repository
            .books
            .books_by_author(id)
            .await?
            .iter()
            .map(BookRef::from)
            .collect();

        Ok(AuthorDetail {
            author: author.into(),
            books,
        })
    }

    pub async fn author_form(&self, id: i32) -> AppResult<AuthorInput> {
        Ok(self.repository.authors.get_author(id).await?.into())
    }

    pub async fn author_summary(&self, id: i32) -> AppResult<AuthorView> {
        Ok(self.repository.authors.get_author(id).await?.into())
    }

    pub async fn create_author(&self, input: AuthorInput) -> AppResult<AuthorView> {
        input.validate()?;

        let author = self.repository.authors.create_author(&input).await?;
        tracing::info!("Created author {} ({})", author, author.id);
        Ok(author.into())
    }

    pub async fn update_author(&self, id: i32, input: AuthorInput) -> AppResult<AuthorView> {
        self.repository.authors.get_author(id).await?;
        input.validate()?;

        let author = self.repository.authors.update_author(id, &input).await?;
        tracing::info!("Updated author {}", id);
        Ok(author.into())
    }

    /// Delete an author; their books keep existing without an author
    pub async fn delete_author(&self, id: i32) -> AppResult<()> {
        self.repository.authors.delete_author(id).await?;
        tracing::info!("Deleted author {}", id);
        Ok(())
    }
}
