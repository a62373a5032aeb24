//! Book instances (copies) repository

use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::FromRow;
use uuid::Uuid;

use super::{
    postgres::{not_found, PgStore},
    Circulation, InstanceFilter, InstanceStore,
};
use crate::{
    error::AppResult,
    models::{
        instance::{BookInstance, InstanceInput, InstanceRecord, LoanStatus},
        listing::{Page, PageRequest, INSTANCE_LIST},
        user::UserRef,
    },
};

const INSTANCE_SELECT: &str = r#"
    SELECT bi.id, bi.book_id, bi.imprint, bi.due_back, bi.status, bi.borrower_id,
           b.title AS book_title, u.username AS borrower_username
    FROM book_instances bi
    JOIN books b ON b.id = bi.book_id
    LEFT JOIN users u ON u.id = bi.borrower_id
"#;

/// `$1` status code, `$2` borrower id; NULL disables the condition
const INSTANCE_FILTER: &str = r#"
    WHERE ($1::text IS NULL OR bi.status = $1)
      AND ($2::int IS NULL OR bi.borrower_id = $2)
"#;

/// Internal row structure for copy queries joined to book and borrower
#[derive(Debug, FromRow)]
struct InstanceRow {
    id: Uuid,
    book_id: i32,
    imprint: String,
    due_back: Option<NaiveDate>,
    status: LoanStatus,
    borrower_id: Option<i32>,
    book_title: String,
    borrower_username: Option<String>,
}

impl From<InstanceRow> for InstanceRecord {
    fn from(row: InstanceRow) -> Self {
        let borrower = match (row.borrower_id, row.borrower_username) {
            (Some(id), Some(username)) => Some(UserRef { id, username }),
            _ => None,
        };

        InstanceRecord {
            instance: BookInstance {
                id: row.id,
                book_id: row.book_id,
                imprint: row.imprint,
                due_back: row.due_back,
                status: row.status,
                borrower_id: row.borrower_id,
            },
            book_title: row.book_title,
            borrower,
        }
    }
}

#[async_trait]
impl InstanceStore for PgStore {
    async fn list_instances(
        &self,
        filter: InstanceFilter,
        request: PageRequest,
    ) -> AppResult<Page<InstanceRecord>> {
        let status = filter.status().map(|s| s.code());
        let borrower_id = filter.borrower_id();

        let total: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*)::bigint FROM book_instances bi {}",
            INSTANCE_FILTER
        ))
        .bind(status)
        .bind(borrower_id)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            "{} {} ORDER BY {} LIMIT $3 OFFSET $4",
            INSTANCE_SELECT,
            INSTANCE_FILTER,
            INSTANCE_LIST.ordering.sql("bi")
        );
        let rows = sqlx::query_as::<_, InstanceRow>(&sql)
            .bind(status)
            .bind(borrower_id)
            .bind(request.per_page)
            .bind(request.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(Page::new(
            rows.into_iter().map(InstanceRecord::from).collect(),
            total,
            request,
        ))
    }

    async fn instances_of_book(&self, book_id: i32) -> AppResult<Vec<InstanceRecord>> {
        let sql = format!(
            "{} WHERE bi.book_id = $1 ORDER BY {}",
            INSTANCE_SELECT,
            INSTANCE_LIST.ordering.sql("bi")
        );
        let rows = sqlx::query_as::<_, InstanceRow>(&sql)
            .bind(book_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(InstanceRecord::from).collect())
    }

    async fn get_instance(&self, id: Uuid) -> AppResult<InstanceRecord> {
        sqlx::query_as::<_, InstanceRow>(&format!("{} WHERE bi.id = $1", INSTANCE_SELECT))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(InstanceRecord::from)
            .ok_or_else(|| not_found("Book instance", id))
    }

    async fn create_instance(&self, input: &InstanceInput) -> AppResult<InstanceRecord> {
        let id = Uuid::new_v4();

        sqlx::query(
            r#"
            INSERT INTO book_instances (id, book_id, imprint, due_back, status, borrower_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(id)
        .bind(input.book_id)
        .bind(&input.imprint)
        .bind(input.due_back)
        .bind(input.status)
        .bind(input.borrower_id)
        .execute(&self.pool)
        .await?;

        self.get_instance(id).await
    }

    async fn update_instance(&self, id: Uuid, input: &InstanceInput) -> AppResult<InstanceRecord> {
        let result = sqlx::query(
            r#"
            UPDATE book_instances
            SET book_id = $1, imprint = $2, due_back = $3, status = $4, borrower_id = $5
            WHERE id = $6
            "#,
        )
        .bind(input.book_id)
        .bind(&input.imprint)
        .bind(input.due_back)
        .bind(input.status)
        .bind(input.borrower_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found("Book instance", id));
        }
        self.get_instance(id).await
    }

    async fn set_due_back(&self, id: Uuid, due_back: NaiveDate) -> AppResult<InstanceRecord> {
        let result = sqlx::query("UPDATE book_instances SET due_back = $1 WHERE id = $2")
            .bind(due_back)
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found("Book instance", id));
        }
        self.get_instance(id).await
    }

    async fn set_circulation(
        &self,
        id: Uuid,
        circulation: Circulation,
    ) -> AppResult<InstanceRecord> {
        let result = sqlx::query(
            r#"
            UPDATE book_instances
            SET status = $1, due_back = $2, borrower_id = $3
            WHERE id = $4
            "#,
        )
        .bind(circulation.status)
        .bind(circulation.due_back)
        .bind(circulation.borrower_id)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(not_found("Book instance", id));
        }
        self.get_instance(id).await
    }

    async fn delete_instance(&self, id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM book_instances WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(not_found("Book instance", id));
        }
        Ok(())
    }

    async fn count_instances(&self, status: Option<LoanStatus>) -> AppResult<i64> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*)::bigint FROM book_instances WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(status.map(|s| s.code()))
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn count_for_book(&self, book_id: i32) -> AppResult<i64> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*)::bigint FROM book_instances WHERE book_id = $1")
                .bind(book_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }
}
