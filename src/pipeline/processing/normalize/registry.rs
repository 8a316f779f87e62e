use std::collections::HashMap;

use super::normalizers::{
    ControversyNormalizer, KindNormalizer, MetricsNormalizer, ParticipationNormalizer,
    PopularityNormalizer,
};
use super::Normalized;
use crate::error::{IngestError, Result};
use crate::pipeline::processing::parser::Table;
use crate::types::DatasetKind;

/// Registry of kind-specific normalization strategies
pub struct NormalizationRegistry {
    normalizers: HashMap<DatasetKind, Box<dyn KindNormalizer>>,
}

impl NormalizationRegistry {
    /// Create a registry with the built-in normalizer for every dataset kind
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Box::new(MetricsNormalizer::new(ParticipationNormalizer::new())));
        registry.register(Box::new(MetricsNormalizer::new(PopularityNormalizer::new())));
        registry.register(Box::new(MetricsNormalizer::new(ControversyNormalizer::new())));
        registry
    }

    pub fn empty() -> Self {
        Self {
            normalizers: HashMap::new(),
        }
    }

    /// Register a normalizer under the kind it reports; replaces any previous one
    pub fn register(&mut self, normalizer: Box<dyn KindNormalizer>) {
        self.normalizers.insert(normalizer.kind(), normalizer);
    }

    pub fn get_normalizer(&self, kind: DatasetKind) -> Option<&dyn KindNormalizer> {
        self.normalizers.get(&kind).map(|n| n.as_ref())
    }

    /// Normalize a table with the normalizer registered for `kind`
    pub fn normalize(&self, kind: DatasetKind, table: &Table<'_>) -> Result<Normalized> {
        self.get_normalizer(kind)
            .map(|normalizer| normalizer.normalize(table))
            .ok_or_else(|| IngestError::UnknownKind(kind.to_string()))
    }

    pub fn list_kinds(&self) -> Vec<DatasetKind> {
        let mut kinds: Vec<_> = self.normalizers.keys().copied().collect();
        kinds.sort_by_key(|k| k.as_str());
        kinds
    }
}

impl Default for NormalizationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
