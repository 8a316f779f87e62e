use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::debug;

use crate::pipeline::pipeline::Ingested;

/// Completed ingests keyed by [`crate::fingerprint::content_key`]
///
/// Keys come from file content, kind and format, never from a file name, so
/// renamed copies hit and edited files miss. Clones share one map.
#[derive(Debug, Clone, Default)]
pub struct IngestCache {
    entries: Arc<Mutex<HashMap<String, Ingested>>>,
}

impl IngestCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Ingested> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.get(key).cloned()
    }

    pub fn insert(&self, key: String, ingested: Ingested) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        debug!("caching ingest under {}", key);
        entries.insert(key, ingested);
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }
}
