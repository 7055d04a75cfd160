use async_trait::async_trait;
use serde::Serialize;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::RwLock;

use crate::error::Result;

/// A stored summarization result
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummarizationRecord {
    pub id: u64,
    pub original_text: String,
    pub summary: String,
}

/// Storage for completed summarizations.
///
/// Ids are assigned by the store, start at 1 and are never reused.
#[async_trait]
pub trait SummaryStore: Send + Sync {
    async fn create(&self, original_text: String, summary: String) -> Result<SummarizationRecord>;

    async fn get(&self, id: u64) -> Result<Option<SummarizationRecord>>;

    async fn count(&self) -> Result<usize>;
}

/// Process-lifetime store; everything is lost on restart.
pub struct MemoryStore {
    next_id: AtomicU64,
    records: RwLock<HashMap<u64, SummarizationRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            records: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SummaryStore for MemoryStore {
    async fn create(&self, original_text: String, summary: String) -> Result<SummarizationRecord> {
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);
        let record = SummarizationRecord {
            id,
            original_text,
            summary,
        };

        self.records.write().await.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: u64) -> Result<Option<SummarizationRecord>> {
        Ok(self.records.read().await.get(&id).cloned())
    }

    async fn count(&self) -> Result<usize> {
        Ok(self.records.read().await.len())
    }
}
