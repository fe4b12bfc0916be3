use std::str::FromStr;

use reprotrace_core::{StorageFault, TraceId, TraceRecord, TraceStore};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

pub mod migrations;
pub mod ops;
pub mod schema;

use migrations::run_migrations;
use ops::{insert_trace_record, load_recent_trace_records, load_trace_record};

pub const DEFAULT_DATABASE_URL: &str = "sqlite://trace_records.sqlite3";

#[derive(Debug, Clone)]
pub struct SqliteTraceStore {
    pool: SqlitePool,
}

#[derive(Debug, Clone)]
pub struct SqliteTraceStoreBuilder {
    database_url: String,
    max_connections: u32,
    create_if_missing: bool,
}

impl SqliteTraceStore {
    pub fn builder(database_url: impl Into<String>) -> SqliteTraceStoreBuilder {
        SqliteTraceStoreBuilder {
            database_url: database_url.into(),
            max_connections: 1,
            create_if_missing: true,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl SqliteTraceStoreBuilder {
    pub fn max_connections(mut self, max_connections: u32) -> Self {
        self.max_connections = max_connections;
        self
    }

    pub fn create_if_missing(mut self, create_if_missing: bool) -> Self {
        self.create_if_missing = create_if_missing;
        self
    }

    /// Opens the pool and ensures the schema exists.
    pub async fn build(self) -> Result<SqliteTraceStore, StorageFault> {
        let options = SqliteConnectOptions::from_str(&self.database_url)
            .map_err(StorageFault::backend)?
            .create_if_missing(self.create_if_missing);

        let pool = SqlitePoolOptions::new()
            .max_connections(self.max_connections)
            .connect_with(options)
            .await
            .map_err(StorageFault::backend)?;

        run_migrations(&pool).await?;
        tracing::debug!(database_url = %self.database_url, "trace store ready");

        Ok(SqliteTraceStore { pool })
    }
}

#[async_trait::async_trait]
impl TraceStore for SqliteTraceStore {
    async fn put(&self, record: &TraceRecord) -> Result<(), StorageFault> {
        insert_trace_record(&self.pool, record).await
    }

    async fn get(&self, id: &TraceId) -> Result<Option<TraceRecord>, StorageFault> {
        load_trace_record(&self.pool, id).await
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<TraceRecord>, StorageFault> {
        load_recent_trace_records(&self.pool, limit).await
    }
}
