//! Durable record of every computed pair

use crate::error::StoreError;
use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

/// A pair about to be written; the id is assigned by the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewResultRecord {
    pub num1: i64,
    pub num2: i64,
    pub target: i64,
}

/// A stored pair
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResultRecord {
    pub id: i64,
    pub num1: i64,
    pub num2: i64,
    pub target: i64,
}

#[async_trait]
pub trait ResultStore: Send + Sync {
    /// Create the schema if it does not exist yet
    async fn init(&self) -> Result<(), StoreError>;

    /// Append one record and return its id
    async fn insert(&self, record: NewResultRecord) -> Result<i64, StoreError>;
}

/// Result store backed by SQLite
#[derive(Debug, Clone)]
pub struct SqliteResultStore {
    pool: SqlitePool,
}

impl SqliteResultStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open a pool on `database_url`, creating the database file if missing
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(options)
            .await?;

        tracing::info!(database_url, max_connections, "connected to result database");
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// All stored records, oldest first
    pub async fn list(&self) -> Result<Vec<ResultRecord>, StoreError> {
        let rows: Vec<(i64, i64, i64, i64)> =
            sqlx::query_as("SELECT id, num1, num2, target FROM two_sum_results ORDER BY id")
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(id, num1, num2, target)| ResultRecord {
                id,
                num1,
                num2,
                target,
            })
            .collect())
    }

    pub async fn count(&self) -> Result<i64, StoreError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM two_sum_results")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.0)
    }
}

#[async_trait]
impl ResultStore for SqliteResultStore {
    async fn init(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS two_sum_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                num1 INTEGER NOT NULL,
                num2 INTEGER NOT NULL,
                target INTEGER NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        tracing::info!("Result database schema initialized");
        Ok(())
    }

    async fn insert(&self, record: NewResultRecord) -> Result<i64, StoreError> {
        let result =
            sqlx::query("INSERT INTO two_sum_results (num1, num2, target) VALUES (?, ?, ?)")
                .bind(record.num1)
                .bind(record.num2)
                .bind(record.target)
                .execute(&self.pool)
                .await?;

        let id = result.last_insert_rowid();
        tracing::debug!(
            id,
            num1 = record.num1,
            num2 = record.num2,
            target = record.target,
            "persisted result"
        );
        Ok(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn memory_store() -> SqliteResultStore {
        let store = SqliteResultStore::connect("sqlite::memory:", 1).await.unwrap();
        store.init().await.unwrap();
        store
    }

    #[tokio::test]
    async fn test_insert_assigns_increasing_ids() {
        let store = memory_store().await;

        let first = store
            .insert(NewResultRecord { num1: 2, num2: 7, target: 9 })
            .await
            .unwrap();
        let second = store
            .insert(NewResultRecord { num1: 2, num2: 4, target: 6 })
            .await
            .unwrap();

        assert!(second > first);
        assert_eq!(store.count().await.unwrap(), 2);

        let records = store.list().await.unwrap();
        assert_eq!(
            records[0],
            ResultRecord { id: first, num1: 2, num2: 7, target: 9 }
        );
        assert_eq!(records[1].target, 6);
    }

    #[tokio::test]
    async fn test_init_is_idempotent() {
        let store = memory_store().await;
        store
            .insert(NewResultRecord { num1: 3, num2: 3, target: 6 })
            .await
            .unwrap();

        store.init().await.unwrap();
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_file_database_is_created() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.db");
        let url = format!("sqlite://{}", path.display());

        let store = SqliteResultStore::connect(&url, 2).await.unwrap();
        store.init().await.unwrap();

        assert!(path.exists());
    }

    #[tokio::test]
    async fn test_insert_without_schema_fails() {
        let store = SqliteResultStore::connect("sqlite::memory:", 1).await.unwrap();
        let err = store
            .insert(NewResultRecord { num1: 1, num2: 2, target: 3 })
            .await
            .unwrap_err();

        assert!(matches!(err, StoreError::Database(_)));
    }
}
