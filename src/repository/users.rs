//! Users repository

use async_trait::async_trait;

use super::{
    postgres::{is_violation, not_found, PgStore, UNIQUE_VIOLATION},
    UserStore,
};
use crate::{
    error::{AppError, AppResult},
    models::user::{NewUser, User, UserRow},
};

#[async_trait]
impl UserStore for PgStore {
    async fn get_user(&self, id: i32) -> AppResult<User> {
        sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password, permissions FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?
        .map(User::from)
        .ok_or_else(|| not_found("User", id))
    }

    async fn find_by_username(&self, username: &str) -> AppResult<Option<User>> {
        let row = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password, permissions FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(User::from))
    }

    async fn create_user(&self, user: &NewUser) -> AppResult<User> {
        let permissions: Vec<&str> = user.permissions.iter().map(|p| p.as_str()).collect();

        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (username, password, permissions)
            VALUES ($1, $2, $3)
            RETURNING id, username, password, permissions
            "#,
        )
        .bind(&user.username)
        .bind(&user.password_hash)
        .bind(&permissions)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if is_violation(&e, UNIQUE_VIOLATION) {
                AppError::field("username", "unique", "A user with that username already exists.")
            } else {
                AppError::Database(e)
            }
        })?;

        Ok(row.into())
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        let rows = sqlx::query_as::<_, UserRow>(
            "SELECT id, username, password, permissions FROM users ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(User::from).collect())
    }
}
