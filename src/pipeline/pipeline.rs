use std::path::Path;
use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, instrument, warn};

use crate::config::Config;
use crate::error::Result;
use crate::fingerprint::content_key;
use crate::metrics::{IngestMetrics, ParserMetrics};
use crate::pipeline::ingestion::{check_size, decode_text, FileSource, InputSource};
use crate::pipeline::processing::graph::{GraphModel, GraphModelBuilder};
use crate::pipeline::processing::normalize::NormalizationRegistry;
use crate::pipeline::processing::parser::{json, CsvParser, MetricsParser, Parser, Table};
use crate::pipeline::processing::validate::SchemaValidator;
use crate::pipeline::storage::IngestCache;
use crate::types::{CanonicalDataset, DatasetKind, InputFormat};

/// What happened during one ingest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IngestReport {
    pub kind: DatasetKind,
    pub format: InputFormat,
    pub content_key: String,
    pub bytes: usize,
    /// Data rows for CSV, top-level entries for JSON
    pub rows: usize,
    /// Records for list kinds, nodes for a controversy graph
    pub records: usize,
    /// Coercion fallbacks and decode notes; never fatal
    pub warnings: Vec<String>,
    pub ingested_at: DateTime<Utc>,
    pub from_cache: bool,
}

/// A complete canonical dataset and its report
#[derive(Debug, Clone, PartialEq)]
pub struct Ingested {
    pub dataset: CanonicalDataset,
    pub report: IngestReport,
}

/// Bytes in, canonical dataset out, all or nothing
///
/// Nothing is produced unless every stage succeeds; a failure leaves any
/// previously returned dataset and the cache untouched.
pub struct Pipeline {
    config: Config,
    registry: NormalizationRegistry,
    cache: Option<IngestCache>,
}

impl Pipeline {
    pub fn new(config: Config) -> Self {
        Self {
            config,
            registry: NormalizationRegistry::new(),
            cache: None,
        }
    }

    /// Consult and fill `cache` on every ingest
    pub fn with_cache(mut self, cache: IngestCache) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Read a file (format from its extension) and ingest it
    pub async fn ingest_file(&self, kind: DatasetKind, path: impl AsRef<Path>) -> Result<Ingested> {
        self.ingest_source(kind, &FileSource::new(path.as_ref())).await
    }

    #[instrument(skip(self, source), fields(kind = %kind, source = %source.name()))]
    pub async fn ingest_source(&self, kind: DatasetKind, source: &dyn InputSource) -> Result<Ingested> {
        let input = source
            .read(self.config.ingest.max_input_bytes)
            .await
            .inspect_err(|e| IngestMetrics::record_failure(e.class().as_str()))?;
        self.ingest_bytes(kind, input.format, &input.bytes)
    }

    #[instrument(skip(self, bytes), fields(kind = %kind, format = %format, bytes = bytes.len()))]
    pub fn ingest_bytes(&self, kind: DatasetKind, format: InputFormat, bytes: &[u8]) -> Result<Ingested> {
        let start_time = Instant::now();
        IngestMetrics::record_input(bytes.len());

        let result = self.run(kind, format, bytes);
        IngestMetrics::record_duration(start_time.elapsed().as_secs_f64());

        match result {
            Ok(ingested) => {
                info!(
                    "ingested {} {} dataset: {} rows -> {} records, {} warnings{}",
                    kind,
                    format,
                    ingested.report.rows,
                    ingested.report.records,
                    ingested.report.warnings.len(),
                    if ingested.report.from_cache { " (cached)" } else { "" }
                );
                Ok(ingested)
            }
            Err(e) => {
                warn!("ingest of {} {} dataset failed: {}", kind, format, e);
                IngestMetrics::record_failure(e.class().as_str());
                Err(e)
            }
        }
    }

    fn run(&self, kind: DatasetKind, format: InputFormat, bytes: &[u8]) -> Result<Ingested> {
        check_size(bytes.len() as u64, self.config.ingest.max_input_bytes)?;

        let key = content_key(kind, format, bytes);
        if let Some(cache) = &self.cache {
            if let Some(mut hit) = cache.get(&key) {
                debug!("cache hit for {}", key);
                IngestMetrics::record_cache_hit();
                hit.report.from_cache = true;
                return Ok(hit);
            }
        }

        let (text, lossy) = decode_text(bytes);
        let mut warnings = Vec::new();
        if lossy {
            warnings.push("input is not valid UTF-8; invalid sequences were replaced".to_string());
        }

        let (dataset, rows) = match format {
            InputFormat::Csv => {
                let (dataset, rows, coercions) = self.from_csv(kind, &text)?;
                warnings.extend(coercions);
                (dataset, rows)
            }
            InputFormat::Json => Self::from_json(kind, &text)?,
        };

        let ingested = Ingested {
            report: IngestReport {
                kind,
                format,
                content_key: key.clone(),
                bytes: bytes.len(),
                rows,
                records: dataset.len(),
                warnings,
                ingested_at: Utc::now(),
                from_cache: false,
            },
            dataset,
        };

        if let Some(cache) = &self.cache {
            cache.insert(key, ingested.clone());
        }
        Ok(ingested)
    }

    fn from_csv(&self, kind: DatasetKind, text: &str) -> Result<(CanonicalDataset, usize, Vec<String>)> {
        let rows = MetricsParser::new(CsvParser::lenient()).parse(text)?;
        let table = Table::from_rows(&rows);
        SchemaValidator::validate_header(kind, table.headers())?;

        let normalized = self.registry.normalize(kind, &table)?;
        for warning in &normalized.warnings {
            warn!("{}", warning);
        }
        Ok((normalized.dataset, table.len(), normalized.warnings))
    }

    fn from_json(kind: DatasetKind, text: &str) -> Result<(CanonicalDataset, usize)> {
        let value = json::parse_json(text).inspect_err(|_| ParserMetrics::record_parse_error("json"))?;
        SchemaValidator::validate_json(kind, &value)?;

        let rows = match &value {
            serde_json::Value::Array(items) => items.len(),
            _ => value
                .get("edges")
                .and_then(|edges| edges.as_array())
                .map_or(0, |edges| edges.len()),
        };
        let dataset = json::decode(kind, value)?;
        Ok((dataset, rows))
    }

    /// Graph model for a dataset; `seed` overrides the configured layout seed
    pub fn build_graph(&self, dataset: &CanonicalDataset, seed: Option<u64>) -> GraphModel {
        GraphModelBuilder::new(&self.config).build_seeded(dataset, seed.or(self.config.layout.seed))
    }
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngestError;

    fn pipeline() -> Pipeline {
        Pipeline::default()
    }

    #[test]
    fn csv_ingest_reports_rows_and_records() {
        let csv = b"author_id,interactions,texts\nu1,3,oi | tchau\nu2,x,\nu1,5,de novo\n";
        let ingested = pipeline()
            .ingest_bytes(DatasetKind::Participation, InputFormat::Csv, csv)
            .unwrap();
        assert_eq!(ingested.report.rows, 3);
        assert_eq!(ingested.report.records, 2);
        assert_eq!(ingested.report.warnings.len(), 1);
        assert_eq!(ingested.report.bytes, csv.len());
        assert!(!ingested.report.from_cache);
    }

    #[test]
    fn oversize_input_fails_before_parsing() {
        let mut config = Config::default();
        config.ingest.max_input_bytes = 8;
        let err = Pipeline::new(config)
            .ingest_bytes(DatasetKind::Participation, InputFormat::Json, b"not even json")
            .unwrap_err();
        assert!(matches!(err, IngestError::OversizeInput { size: 13, limit: 8 }));
    }

    #[test]
    fn schema_violation_produces_nothing() {
        let err = pipeline()
            .ingest_bytes(DatasetKind::Popularity, InputFormat::Csv, b"author_id\nu1\n")
            .unwrap_err();
        match err {
            IngestError::SchemaViolation { missing, .. } => assert_eq!(missing, vec!["texts", "name"]),
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn json_syntax_errors_are_malformed() {
        let err = pipeline()
            .ingest_bytes(DatasetKind::Controversy, InputFormat::Json, b"{\"nodes\": [")
            .unwrap_err();
        assert!(matches!(err, IngestError::MalformedSyntax { format: InputFormat::Json, .. }));
    }

    #[test]
    fn json_controversy_counts_edges_as_rows() {
        let doc = br#"{"nodes": [{"id": "a"}, {"id": "b"}], "edges": [{"source": "a", "target": "b"}]}"#;
        let ingested = pipeline()
            .ingest_bytes(DatasetKind::Controversy, InputFormat::Json, doc)
            .unwrap();
        assert_eq!(ingested.report.rows, 1);
        assert_eq!(ingested.report.records, 2);
    }

    #[test]
    fn cache_is_keyed_by_content() {
        let cache = IngestCache::new();
        let pipeline = pipeline().with_cache(cache.clone());
        let csv = b"author_id,texts\nu1,oi\n";

        let first = pipeline
            .ingest_bytes(DatasetKind::Participation, InputFormat::Csv, csv)
            .unwrap();
        let second = pipeline
            .ingest_bytes(DatasetKind::Participation, InputFormat::Csv, csv)
            .unwrap();
        assert!(second.report.from_cache);
        assert_eq!(first.dataset, second.dataset);
        assert_eq!(cache.len(), 1);

        pipeline
            .ingest_bytes(DatasetKind::Popularity, InputFormat::Csv, b"author_id,texts,name\nu1,oi,Ana\n")
            .unwrap();
        assert_eq!(cache.len(), 2);
    }

    #[test]
    fn failed_ingest_is_not_cached() {
        let cache = IngestCache::new();
        let pipeline = pipeline().with_cache(cache.clone());
        assert!(pipeline
            .ingest_bytes(DatasetKind::Participation, InputFormat::Csv, b"texts\noi\n")
            .is_err());
        assert!(cache.is_empty());
    }

    #[test]
    fn graph_uses_configured_seed() {
        let mut config = Config::default();
        config.layout.seed = Some(11);
        let pipeline = Pipeline::new(config);
        let dataset = pipeline
            .ingest_bytes(DatasetKind::Participation, InputFormat::Csv, b"author_id,texts\nu1,oi\nu2,ok\n")
            .unwrap()
            .dataset;
        assert_eq!(pipeline.build_graph(&dataset, None), pipeline.build_graph(&dataset, None));
    }
}
