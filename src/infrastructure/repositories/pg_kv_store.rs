use super::kv_store::KeyValueStore;
use crate::error::AppResult;
use crate::infrastructure::db::{check_connection, DbPool};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;

/// PostgreSQL-backed store over the `client_store` table
pub struct PgKeyValueStore {
    pool: Arc<DbPool>,
}

impl PgKeyValueStore {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl KeyValueStore for PgKeyValueStore {
    async fn get(&self, key: &str) -> AppResult<Option<String>> {
        let pool = self.pool.as_ref();

        let value = sqlx::query_scalar::<_, String>(
            r#"
            SELECT value
            FROM client_store
            WHERE key = $1
            "#,
        )
        .bind(key)
        .fetch_optional(pool)
        .await?;

        Ok(value)
    }

    async fn set(&self, key: &str, value: &str) -> AppResult<()> {
        let pool = self.pool.as_ref();

        sqlx::query(
            r#"
            INSERT INTO client_store (key, value, updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (key)
            DO UPDATE SET
                value = EXCLUDED.value,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Utc::now())
        .execute(pool)
        .await?;

        Ok(())
    }

    async fn ping(&self) -> AppResult<()> {
        check_connection(&self.pool).await?;
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "postgres"
    }
}
