//! Single-use transfer of a canonical dataset between a producer and a consumer.
//!
//! A [`Handoff`] owns the serialized payload; opening it consumes it. The
//! [`HandoffStore`] parks sealed handoffs under an id for consumers that
//! pick them up later, and forgets each one once taken.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{IngestError, Result};
use crate::types::{CanonicalDataset, DatasetKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Handoff {
    id: Uuid,
    kind: DatasetKind,
    sealed_at: DateTime<Utc>,
    payload: String,
}

impl Handoff {
    /// Serialize the dataset once; later readers never see the live value
    pub fn seal(dataset: &CanonicalDataset) -> Result<Self> {
        let payload = serde_json::to_string(dataset)?;
        let handoff = Self {
            id: Uuid::new_v4(),
            kind: dataset.kind(),
            sealed_at: Utc::now(),
            payload,
        };
        debug!(
            "sealed {} handoff {} ({} bytes)",
            handoff.kind,
            handoff.id,
            handoff.payload.len()
        );
        Ok(handoff)
    }

    /// Accept a payload produced elsewhere; it must decode as a canonical dataset
    pub fn from_payload(payload: String) -> Result<Self> {
        let dataset: CanonicalDataset = serde_json::from_str(&payload)?;
        Ok(Self {
            id: Uuid::new_v4(),
            kind: dataset.kind(),
            sealed_at: Utc::now(),
            payload,
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn kind(&self) -> DatasetKind {
        self.kind
    }

    pub fn sealed_at(&self) -> DateTime<Utc> {
        self.sealed_at
    }

    pub fn payload(&self) -> &str {
        &self.payload
    }

    pub fn into_payload(self) -> String {
        self.payload
    }

    /// Decode the dataset, consuming the handoff
    pub fn open(self) -> Result<CanonicalDataset> {
        let dataset: CanonicalDataset = serde_json::from_str(&self.payload)?;
        debug!("opened {} handoff {}", self.kind, self.id);
        Ok(dataset)
    }
}

/// Keyed holding area for sealed handoffs; `take` removes what it returns
#[derive(Debug, Clone, Default)]
pub struct HandoffStore {
    entries: Arc<Mutex<HashMap<Uuid, Handoff>>>,
}

impl HandoffStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put(&self, handoff: Handoff) -> Uuid {
        let id = handoff.id();
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(id, handoff);
        debug!("stored handoff {}", id);
        id
    }

    pub fn take(&self, id: Uuid) -> Result<Handoff> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.remove(&id).ok_or(IngestError::HandoffMissing(id))
    }

    pub fn len(&self) -> usize {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
