use reprotrace_core::StorageFault;
use sqlx::SqlitePool;

use crate::schema::MIGRATION_STATEMENTS_SQL;

/// Idempotent; safe on every process start.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageFault> {
    for statement in MIGRATION_STATEMENTS_SQL {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(StorageFault::backend)?;
    }

    Ok(())
}
