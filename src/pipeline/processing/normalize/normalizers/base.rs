use std::collections::HashMap;
use std::time::Instant;

use tracing::debug;

use super::super::Normalized;
use crate::common::coerce::{clamp_amount, is_tagged, parse_count, parse_number, split_tagged_texts, split_texts};
use crate::metrics::NormalizeMetrics;
use crate::pipeline::processing::parser::{Record, Table};
use crate::types::{DatasetKind, Position, TaggedText};

/// Base trait for kind-specific normalizers
///
/// Implementations keep no state between calls: normalizing the same table
/// twice yields the same dataset.
pub trait KindNormalizer: Send + Sync {
    /// Rebuild canonical records from header-projected rows
    fn normalize(&self, table: &Table<'_>) -> Normalized;

    /// The dataset kind this normalizer produces
    fn kind(&self) -> DatasetKind;

    /// Human-readable name for logs
    fn name(&self) -> &str;
}

/// A wrapper that adds metrics to any normalizer implementation
pub struct MetricsNormalizer<N: KindNormalizer> {
    inner: N,
}

impl<N: KindNormalizer> MetricsNormalizer<N> {
    pub fn new(inner: N) -> Self {
        Self { inner }
    }
}

impl<N: KindNormalizer> KindNormalizer for MetricsNormalizer<N> {
    fn normalize(&self, table: &Table<'_>) -> Normalized {
        let start_time = Instant::now();
        let normalized = self.inner.normalize(table);
        let kind = self.inner.kind().as_str();

        NormalizeMetrics::record_normalized(kind, normalized.dataset.len());
        NormalizeMetrics::record_coercion_fallbacks(kind, normalized.warnings.len());
        NormalizeMetrics::record_duplicates(kind, normalized.duplicates);

        debug!(
            "{}: {} rows -> {} records in {:?}",
            self.inner.name(),
            table.len(),
            normalized.dataset.len(),
            start_time.elapsed()
        );
        normalized
    }

    fn kind(&self) -> DatasetKind {
        self.inner.kind()
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

/// Cell reader that applies the coercion fallbacks and remembers every
/// non-empty cell it had to replace
#[derive(Debug, Default)]
pub struct FieldReader {
    warnings: Vec<String>,
}

impl FieldReader {
    pub fn new() -> Self {
        Self::default()
    }

    fn fallback(&mut self, record: &Record<'_>, field: &str, raw: &str, used: &str) {
        self.warnings.push(format!(
            "record {}: `{}` value {:?} is not valid; using {}",
            record.number(),
            field,
            raw,
            used
        ));
    }

    pub fn text(&self, record: &Record<'_>, field: &str) -> String {
        record.get(field).to_string()
    }

    /// Non-negative integer; empty and unparsable cells read as 0
    pub fn count(&mut self, record: &Record<'_>, field: &str) -> u64 {
        let raw = record.get(field);
        if raw.trim().is_empty() {
            return 0;
        }
        match parse_count(raw) {
            Some(n) => n,
            None => {
                self.fallback(record, field, raw, "0");
                0
            }
        }
    }

    /// Stance count; negative values clamp to 0
    pub fn amount(&mut self, record: &Record<'_>, field: &str) -> f64 {
        self.read_amount(record, field, "0").unwrap_or(0.0)
    }

    /// Like [`FieldReader::amount`], but an empty or unparsable cell is absent
    pub fn optional_amount(&mut self, record: &Record<'_>, field: &str) -> Option<f64> {
        self.read_amount(record, field, "the sum of the counts")
    }

    fn read_amount(&mut self, record: &Record<'_>, field: &str, used: &str) -> Option<f64> {
        let raw = record.get(field);
        if raw.trim().is_empty() {
            return None;
        }
        match parse_number(raw) {
            Some(v) if v < 0.0 => {
                self.fallback(record, field, raw, "0");
                Some(clamp_amount(v))
            }
            Some(v) => Some(v),
            None => {
                self.fallback(record, field, raw, used);
                None
            }
        }
    }

    fn coordinate(&mut self, record: &Record<'_>, field: &str) -> f64 {
        let raw = record.get(field);
        if raw.trim().is_empty() {
            return 0.0;
        }
        parse_number(raw).unwrap_or_else(|| {
            self.fallback(record, field, raw, "0");
            0.0
        })
    }

    /// Present unless both coordinate cells are empty
    pub fn position(&mut self, record: &Record<'_>) -> Option<Position> {
        if record.get("x").trim().is_empty() && record.get("y").trim().is_empty() {
            return None;
        }
        Some(Position {
            x: self.coordinate(record, "x"),
            y: self.coordinate(record, "y"),
        })
    }

    pub fn texts(&self, record: &Record<'_>, field: &str) -> Vec<String> {
        split_texts(record.get(field))
    }

    /// `label(category)` segments; one warning per cell with untagged segments
    pub fn tagged_texts(&mut self, record: &Record<'_>, field: &str) -> Vec<TaggedText> {
        let raw = record.get(field);
        let untagged = split_texts(raw)
            .iter()
            .filter(|segment| !segment.is_empty() && !is_tagged(segment))
            .count();
        if untagged > 0 {
            self.warnings.push(format!(
                "record {}: {} `{}` segment(s) carry no stance tag; using neutralidade",
                record.number(),
                untagged,
                field
            ));
        }
        split_tagged_texts(raw)
    }

    pub fn into_warnings(self) -> Vec<String> {
        self.warnings
    }
}

/// Id-keyed collection where a repeated id replaces the earlier record in place
#[derive(Debug)]
pub struct LastWins<T> {
    items: Vec<T>,
    slots: HashMap<String, usize>,
    duplicates: usize,
}

impl<T> Default for LastWins<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            slots: HashMap::new(),
            duplicates: 0,
        }
    }
}

impl<T> LastWins<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records with an empty id never collide with each other
    pub fn insert(&mut self, id: &str, item: T) {
        if id.is_empty() {
            self.items.push(item);
            return;
        }
        match self.slots.get(id) {
            Some(&slot) => {
                self.items[slot] = item;
                self.duplicates += 1;
            }
            None => {
                self.slots.insert(id.to_string(), self.items.len());
                self.items.push(item);
            }
        }
    }

    pub fn duplicates(&self) -> usize {
        self.duplicates
    }

    pub fn into_items(self) -> Vec<T> {
        self.items
    }
}
