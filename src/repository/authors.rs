//! Authors repository

use async_trait::async_trait;

use super::{
    postgres::{not_found, PgStore},
    AuthorStore,
};
use crate::{
    error::AppResult,
    models::{
        author::{Author, AuthorInput},
        listing::{Page, PageRequest, AUTHOR_LIST},
    },
};

const AUTHOR_COLUMNS: &str = "id, first_name, last_name, date_of_birth, date_of_death, biography";

#[async_trait]
impl AuthorStore for PgStore {
    async fn list_authors(&self, request: PageRequest) -> AppResult<Page<Author>> {
        let total = self.count_authors().await?;

        let sql = format!(
            "SELECT a.* FROM authors a ORDER BY {} LIMIT $1 OFFSET $2",
            AUTHOR_LIST.ordering.sql("a")
        );
        let authors = sqlx::query_as::<_, Author>(&sql)
            .bind(request.per_page)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(authors, total, request))
    }

    async fn get_author(&self, id: i32) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(&format!(
            "SELECT {} FROM authors WHERE id = $1",
            AUTHOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found("Author", id))
    }

    async fn create_author(&self, input: &AuthorInput) -> AppResult<Author> {
        let author = sqlx::query_as::<_, Author>(&format!(
            r#"
            INSERT INTO authors (first_name, last_name, date_of_birth, date_of_death, biography)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        ))
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.date_of_birth)
        .bind(input.date_of_death)
        .bind(&input.biography)
        .fetch_one(&self.pool)
        .await?;
        Ok(author)
    }

    async fn update_author(&self, id: i32, input: &AuthorInput) -> AppResult<Author> {
        sqlx::query_as::<_, Author>(&format!(
            r#"
            UPDATE authors
            SET first_name = $1, last_name = $2, date_of_birth = $3,
                date_of_death = $4, biography = $5
            WHERE id = $6
            RETURNING {}
            "#,
            AUTHOR_COLUMNS
        ))
        .bind(&input.first_name)
        .bind(&input.last_name)
        .bind(input.date_of_birth)
        .bind(input.date_of_death)
        .bind(&input.biography)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found("Author", id))
    }

    async fn delete_author(&self, id: i32) -> AppResult<()> {
        // books.author_id is ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM authors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found("Author", id));
        }
        Ok(())
    }

    async fn count_authors(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*)::bigint FROM authors")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
