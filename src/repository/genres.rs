//! Genres repository

use async_trait::async_trait;

use super::{
    postgres::{not_found, PgStore},
    GenreStore,
};
use crate::{
    error::AppResult,
    models::{
        listing::{Page, PageRequest, GENRE_LIST},
        reference::{Genre, GenreInput},
    },
};

#[async_trait]
impl GenreStore for PgStore {
    async fn list_genres(&self, request: PageRequest) -> AppResult<Page<Genre>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*)::bigint FROM genres")
            .fetch_one(&self.pool)
            .await?;

        let sql = format!(
            "SELECT g.id, g.name FROM genres g ORDER BY {} LIMIT $1 OFFSET $2",
            GENRE_LIST.ordering.sql("g")
        );
        let genres = sqlx::query_as::<_, Genre>(&sql)
            .bind(request.per_page)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(genres, total, request))
    }

    async fn get_genre(&self, id: i32) -> AppResult<Genre> {
        sqlx::query_as::<_, Genre>("SELECT id, name FROM genres WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("Genre", id))
    }

    async fn find_genres(&self, ids: &[i32]) -> AppResult<Vec<Genre>> {
        let genres = sqlx::query_as::<_, Genre>(
            "SELECT id, name FROM genres WHERE id = ANY($1) ORDER BY name, id",
        )
        .bind(ids)
        .fetch_all(&self.pool)
        .await?;
        Ok(genres)
    }

    async fn create_genre(&self, input: &GenreInput) -> AppResult<Genre> {
        let genre = sqlx::query_as::<_, Genre>(
            "INSERT INTO genres (name) VALUES ($1) RETURNING id, name",
        )
        .bind(&input.name)
        .fetch_one(&self.pool)
        .await?;
        Ok(genre)
    }

    async fn update_genre(&self, id: i32, input: &GenreInput) -> AppResult<Genre> {
        sqlx::query_as::<_, Genre>("UPDATE genres SET name = $1 WHERE id = $2 RETURNING id, name")
            .bind(&input.name)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| not_found("Genre", id))
    }

    async fn delete_genre(&self, id: i32) -> AppResult<()> {
        // book_genres rows go with it (ON DELETE CASCADE)
        let result = sqlx::query("DELETE FROM genres WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found("Genre", id));
        }
        Ok(())
    }

    async fn count_genres(&self) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*)::bigint FROM genres")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
