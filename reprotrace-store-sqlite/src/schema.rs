pub const TRACE_RECORDS_TABLE: &str = "trace_records";
pub const SCHEMA_VERSION: u32 = 1;

pub const CREATE_TRACE_RECORDS_TABLE_SQL: &str = "CREATE TABLE IF NOT EXISTS trace_records (\
    id TEXT PRIMARY KEY,\
    created_at_ms INTEGER NOT NULL,\
    payload_json TEXT NOT NULL\
)";

pub const CREATE_TRACE_RECORDS_CREATED_AT_INDEX_SQL: &str =
    "CREATE INDEX IF NOT EXISTS idx_trace_records_created_at_ms ON trace_records (created_at_ms)";

pub const MIGRATION_STATEMENTS_SQL: [&str; 2] = [
    CREATE_TRACE_RECORDS_TABLE_SQL,
    CREATE_TRACE_RECORDS_CREATED_AT_INDEX_SQL,
];

pub const INSERT_TRACE_RECORD_SQL: &str =
    "INSERT INTO trace_records (id, created_at_ms, payload_json) VALUES (?, ?, ?)";

pub const SELECT_TRACE_RECORD_SQL: &str =
    "SELECT id, created_at_ms, payload_json FROM trace_records WHERE id = ?";

pub const SELECT_RECENT_TRACE_RECORDS_SQL: &str = "SELECT id, created_at_ms, payload_json \
    FROM trace_records ORDER BY created_at_ms DESC, id DESC LIMIT ?";
