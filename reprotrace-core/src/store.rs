use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::{StorageFault, TraceId, TraceRecord};

/// Append-only store of trace records. Records are never updated or deleted.
#[async_trait::async_trait]
pub trait TraceStore: Send + Sync {
    /// Fails with [`StorageFault::DuplicateId`] when the id is already taken.
    async fn put(&self, record: &TraceRecord) -> Result<(), StorageFault>;
    async fn get(&self, id: &TraceId) -> Result<Option<TraceRecord>, StorageFault>;
    /// Newest first, by `created_at_ms`; ties fall back to descending id.
    async fn list_recent(&self, limit: usize) -> Result<Vec<TraceRecord>, StorageFault>;
}

#[derive(Default, Clone)]
pub struct InMemoryTraceStore {
    inner: Arc<RwLock<HashMap<TraceId, TraceRecord>>>,
}

impl InMemoryTraceStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned() -> StorageFault {
    StorageFault::backend("in-memory trace store lock poisoned")
}

#[async_trait::async_trait]
impl TraceStore for InMemoryTraceStore {
    async fn put(&self, record: &TraceRecord) -> Result<(), StorageFault> {
        let mut guard = self.inner.write().map_err(|_| poisoned())?;
        if guard.contains_key(&record.id) {
            return Err(StorageFault::DuplicateId(record.id));
        }
        guard.insert(record.id, record.clone());
        Ok(())
    }

    async fn get(&self, id: &TraceId) -> Result<Option<TraceRecord>, StorageFault> {
        let guard = self.inner.read().map_err(|_| poisoned())?;
        Ok(guard.get(id).cloned())
    }

    async fn list_recent(&self, limit: usize) -> Result<Vec<TraceRecord>, StorageFault> {
        let guard = self.inner.read().map_err(|_| poisoned())?;
        let mut records: Vec<TraceRecord> = guard.values().cloned().collect();
        records.sort_by(|a, b| {
            b.created_at_ms
                .cmp(&a.created_at_ms)
                .then_with(|| b.id.to_string().cmp(&a.id.to_string()))
        });
        records.truncate(limit);
        Ok(records)
    }
}
