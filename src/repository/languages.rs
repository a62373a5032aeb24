//! Languages repository

use async_trait::async_trait;

use super::{
    postgres::{not_found, PgStore},
    LanguageStore,
};
use crate::{
    error::AppResult,
    models::{
        listing::{Page, PageRequest, LANGUAGE_LIST},
        reference::{Language, LanguageInput},
    },
};

#[async_trait]
impl LanguageStore for PgStore {
    async fn list_languages(&self, request: PageRequest) -> AppResult<Page<Language>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*)::bigint FROM languages")
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT l.id, l.name FROM languages l ORDER BY {} LIMIT $1 OFFSET $2",
            LANGUAGE_LIST.ordering.sql("l")
        );
        let languages = sqlx::query_as::<_, Language>(&sql)
            .bind(request.per_page)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(languages, total, request))
    }

    async fn get_language(&self, id: i32) -> AppResult<Language> {
        sqlx::query_as::<_, Language>("SELECT id, name FROM languages WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("Language", id))
    }

    async fn create_language(&self, input: &LanguageInput) -> AppResult<Language> {
        let language = sqlx::query_as::<_, Language>(
            "INSERT INTO languages (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&input.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(language)
    }

    async fn update_language(&self, id: i32, input: &LanguageInput) -> AppResult<Language> {
        sqlx::query_as::<_, Language>(
            "UPDATE languages SET name = $1 WHERE id = $2 RETURNING id, name",
        )
        .bind(&input.name)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| not_found("Language", id))
    }

    async fn delete_language(&self, id: i32) -> AppResult<()> {
        // books.language_id is ON DELETE SET NULL
        let result = sqlx::query("DELETE FROM languages WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found("Language", id));
        }
        Ok(())
    }
}
