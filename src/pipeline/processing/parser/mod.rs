//! Turning decoded text into rows (CSV) or a document tree (JSON).

pub mod csv;
pub mod json;
pub mod table;

pub use self::csv::{parse_csv, CsvParser};
pub use self::table::{Record, Table};

use crate::error::Result;
use crate::metrics::ParserMetrics;
use crate::types::InputFormat;

/// One CSV line split into fields; row 0 of a document is its header
pub type RawRow = Vec<String>;

pub trait Parser {
    /// Input format this parser reads; labels its metrics
    fn format(&self) -> InputFormat;

    fn parse(&self, text: &str) -> Result<Vec<RawRow>>;
}

/// A wrapper that adds metrics to any parser implementation
pub struct MetricsParser<P: Parser> {
    inner: P,
}

impl<P: Parser> MetricsParser<P> {
    pub fn new(inner: P) -> Self {
        Self { inner }
    }
}

impl<P: Parser> Parser for MetricsParser<P> {
    fn format(&self) -> InputFormat {
        self.inner.format()
    }

    fn parse(&self, text: &str) -> Result<Vec<RawRow>> {
        let start_time = std::time::Instant::now();

        match self.inner.parse(text) {
            Ok(rows) => {
                ParserMetrics::record_parse_success(rows.len(), start_time.elapsed().as_secs_f64());
                Ok(rows)
            }
            Err(e) => {
                ParserMetrics::record_parse_error(self.format().as_str());
                Err(e)
            }
        }
    }
}
