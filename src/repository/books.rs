//! Books repository

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{FromRow, Postgres, Transaction};

use super::{
    postgres::{is_violation, not_found, PgStore, FOREIGN_KEY_VIOLATION, UNIQUE_VIOLATION},
    BookStore,
};
use crate::{
    error::{AppError, AppResult},
    models::{
        author::Author,
        book::{Book, BookInput, BookRecord},
        listing::{Page, PageRequest, BOOK_LIST},
        reference::{Genre, Language},
    },
};

const BOOK_COLUMNS: &str = "id, title, summary, isbn, author_id, language_id";

/// Genre joined to the book it is attached to
#[derive(Debug, FromRow)]
struct BookGenreRow {
    book_id: i32,
    id: i32,
    name: String,
}

pub(crate) fn duplicate_isbn() -> AppError {
    AppError::field("isbn", "unique", "Book with this ISBN already exists.")
}

fn map_write_error(err: sqlx::Error) -> AppError {
    if is_violation(&err, UNIQUE_VIOLATION) {
        duplicate_isbn()
    } else {
        AppError::Database(err)
    }
}

impl PgStore {
    /// Resolve author, language and genres for a batch of books
    async fn hydrate(&self, books: Vec<Book>) -> AppResult<Vec<BookRecord>> {
        if books.is_empty() {
            return Ok(Vec::new());
        }

        let book_ids: Vec<i32> = books.iter().map(|b| b.id).collect();
        let author_ids: Vec<i32> = books.iter().filter_map(|b| b.author_id).collect();
        let language_ids: Vec<i32> = books.iter().filter_map(|b| b.language_id).collect();

        let authors: HashMap<i32, Author> =
            sqlx::query_as::<_, Author>("SELECT * FROM authors WHERE id = ANY($1)")
                .bind(&author_ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|a| (a.id, a))
                .collect();

        let languages: HashMap<i32, Language> =
            sqlx::query_as::<_, Language>("SELECT id, name FROM languages WHERE id = ANY($1)")
                .bind(&language_ids)
                .fetch_all(&self.pool)
                .await?
                .into_iter()
                .map(|l| (l.id, l))
                .collect();

        let genre_rows = sqlx::query_as::<_, BookGenreRow>(
            r#"
            SELECT bg.book_id, g.id, g.name
            FROM book_genres bg
            JOIN genres g ON g.id = bg.genre_id
            WHERE bg.book_id = ANY($1)
            ORDER BY g.name, g.id
            "#,
        )
        .bind(&book_ids)
        .fetch_all(&self.pool)
        .await?;

        let mut genres: HashMap<i32, Vec<Genre>> = HashMap::new();
        for row in genre_rows {
            genres.entry(row.book_id).or_default().push(Genre {
                id: row.id,
                name: row.name,
            });
        }

        Ok(books
            .into_iter()
            .map(|book| BookRecord {
                author: book.author_id.and_then(|id| authors.get(&id).cloned()),
                language: book.language_id.and_then(|id| languages.get(&id).cloned()),
                genres: genres.remove(&book.id).unwrap_or_default(),
                book,
            })
            .collect())
    }

    async fn replace_genres(
        tx: &mut Transaction<'_, Postgres>,
        book_id: i32,
        genre_ids: &[i32],
    ) -> AppResult<()> {
        sqlx::query("DELETE FROM book_genres WHERE book_id = $1")
            .bind(book_id)
            .execute(&mut **tx)
            .await?;

        sqlx::query(
            r#"
            INSERT INTO book_genres (book_id, genre_id)
            SELECT $1, g FROM UNNEST($2::int[]) AS g
            ON CONFLICT DO NOTHING
            "#,
        )
        .bind(book_id)
        .bind(genre_ids)
        .execute(&mut **tx)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl BookStore for PgStore {
    async fn list_books(&self, request: PageRequest) -> AppResult<Page<BookRecord>> {
        let total = self.count_books().await?;

        let sql = format!(
            "SELECT b.* FROM books b ORDER BY {} LIMIT $1 OFFSET $2",
            BOOK_LIST.ordering.sql("b")
        );
        let books = sqlx::query_as::<_, Book>(&sql)
            .bind(request.per_page)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(self.hydrate(books).await?, total, request))
    }

    async fn get_book(&self, id: i32) -> AppResult<BookRecord> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found("Book", id))?;

        self.hydrate(vec![book])
            .await?
            .pop()
            .ok_or_else(|| not_found("Book", id))
    }

    async fn find_by_isbn(&self, isbn: &str) -> AppResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE isbn = $1",
            BOOK_COLUMNS
        ))
        .bind(isbn)
        .fetch_optional(&self.pool)
        .await?;
        Ok(book)
    }

    async fn books_by_author(&self, author_id: i32) -> AppResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {} FROM books WHERE author_id = $1 ORDER BY title, id",
            BOOK_COLUMNS
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(books)
    }

    async fn create_book(&self, input: &BookInput) -> AppResult<BookRecord> {
        let mut tx = self.pool.begin().await?;

        let id: i32 = sqlx::query_scalar(
            r#"
            INSERT INTO books (title, summary, isbn, author_id, language_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id
            "#,
        )
        .bind(&input.title)
        .bind(&input.summary)
        .bind(&input.isbn)
        .bind(input.author_id)
        .bind(input.language_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(map_write_error)?;

        Self::replace_genres(&mut tx, id, &input.genre_ids).await?;
        tx.commit().await?;

        self.get_book(id).await
    }

    async fn update_book(&self, id: i32, input: &BookInput) -> AppResult<BookRecord> {
        let mut tx = self.pool.begin().await?;

        sqlx::query_scalar::<_, i32>(
            r#"
            UPDATE books
            SET title = $1, summary = $2, isbn = $3, author_id = $4, language_id = $5
            WHERE id = $6
            RETURNING id
            "#,
        )
        .bind(&input.title)
        .bind(&input.summary)
        .bind(&input.isbn)
        .bind(input.author_id)
        .bind(input.language_id)
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(map_write_error)?
        .ok_or_else(|| not_found("Book", id))?;

        Self::replace_genres(&mut tx, id, &input.genre_ids).await?;
        tx.commit().await?;

        self.get_book(id).await
    }

    async fn delete_book(&self, id: i32) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                if is_violation(&e, FOREIGN_KEY_VIOLATION) {
                    AppError::Conflict(format!("Book {} still has copies", id))
                } else {
                    AppError::Database(e)
                }
            })?;

        if result.rows_affected() == 0 {
            return Err(not_found("Book", id));
        }
        Ok(())
    }

    async fn count_books(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*)::bigint FROM books")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn count_books_with_title_containing(&self, needle: &str) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*)::bigint FROM books WHERE strpos(title, $1) > 0")
                .bind(needle)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
