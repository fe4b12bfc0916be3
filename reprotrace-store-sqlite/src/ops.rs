use reprotrace_core::{StorageFault, TraceId, TraceRecord};
use sqlx::SqlitePool;

use crate::schema::{
    INSERT_TRACE_RECORD_SQL, SELECT_RECENT_TRACE_RECORDS_SQL, SELECT_TRACE_RECORD_SQL,
};

type TraceRow = (String, i64, String);

pub async fn insert_trace_record(pool: &SqlitePool, record: &TraceRecord) -> Result<(), StorageFault> {
    let payload_json = serde_json::to_string(record)?;

    let result = sqlx::query(INSERT_TRACE_RECORD_SQL)
        .bind(record.id.to_string())
        .bind(record.created_at_ms)
        .bind(payload_json)
        .execute(pool)
        .await;

    match result {
        Ok(_) => Ok(()),
        Err(sqlx::Error::Database(error)) if error.is_unique_violation() => {
            Err(StorageFault::DuplicateId(record.id))
        }
        Err(error) => Err(StorageFault::backend(error)),
    }
}

pub async fn load_trace_record(
    pool: &SqlitePool,
    id: &TraceId,
) -> Result<Option<TraceRecord>, StorageFault> {
    let row: Option<TraceRow> = sqlx::query_as(SELECT_TRACE_RECORD_SQL)
        .bind(id.to_string())
        .fetch_optional(pool)
        .await
        .map_err(StorageFault::backend)?;

    row.map(decode_row).transpose()
}

pub async fn load_recent_trace_records(
    pool: &SqlitePool,
    limit: usize,
) -> Result<Vec<TraceRecord>, StorageFault> {
    let limit = i64::try_from(limit).unwrap_or(i64::MAX);
    let rows: Vec<TraceRow> = sqlx::query_as(SELECT_RECENT_TRACE_RECORDS_SQL)
        .bind(limit)
        .fetch_all(pool)
        .await
        .map_err(StorageFault::backend)?;

    rows.into_iter().map(decode_row).collect()
}

/// The payload must parse as a well-formed record and agree with its row's
/// key columns; anything else is corruption.
fn decode_row((id, created_at_ms, payload_json): TraceRow) -> Result<TraceRecord, StorageFault> {
    let record: TraceRecord =
        serde_json::from_str(&payload_json).map_err(|error| StorageFault::Corrupt {
            id: id.clone(),
            reason: error.to_string(),
        })?;

    if record.id.to_string() != id {
        return Err(StorageFault::Corrupt {
            reason: format!("payload id '{}' does not match row id", record.id),
            id,
        });
    }
    if record.created_at_ms != created_at_ms {
        return Err(StorageFault::Corrupt {
            id,
            reason: format!(
                "payload createdAtMs {} does not match row value {created_at_ms}",
                record.created_at_ms
            ),
        });
    }
    record.validate().map_err(|error| StorageFault::Corrupt {
        id: record.id.to_string(),
        reason: error.to_string(),
    })?;

    Ok(record)
}
