use tracing::{debug, warn};

use super::{Parser, RawRow};
use crate::error::{IngestError, Result};
use crate::metrics::ParserMetrics;
use crate::types::InputFormat;

/// Rows of a document plus whether the input ended inside a quoted field
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tokenized {
    pub rows: Vec<RawRow>,
    pub unterminated_quote: bool,
}

/// Single left-to-right scan with one character of lookahead.
///
/// - `""` anywhere emits one literal quote, in or out of a quoted field
/// - a lone `"` toggles quoted mode; inside it commas and line breaks are data
/// - `,` ends a field; `\n` or `\r` ends a row
/// - a row is emitted only if it holds a non-empty field or more than one field,
///   so blank lines (and the `\n` of a `\r\n` pair) produce nothing
pub fn tokenize(text: &str) -> Tokenized {
    let mut rows: Vec<RawRow> = Vec::new();
    let mut row: RawRow = Vec::new();
    let mut current = String::new();
    let mut inside_quotes = false;

    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '"' if chars.peek() == Some(&'"') => {
                chars.next();
                current.push('"');
            }
            '"' => inside_quotes = !inside_quotes,
            ',' if !inside_quotes => row.push(std::mem::take(&mut current)),
            '\n' | '\r' if !inside_quotes => {
                if !current.is_empty() || !row.is_empty() {
                    row.push(std::mem::take(&mut current));
                    rows.push(std::mem::take(&mut row));
                }
                current.clear();
                row.clear();
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() || !row.is_empty() {
        row.push(current);
        rows.push(row);
    }

    Tokenized {
        rows,
        unterminated_quote: inside_quotes,
    }
}

/// Lenient parse: an unbalanced quote swallows the rest of the input as data
pub fn parse_csv(text: &str) -> Vec<RawRow> {
    tokenize(text).rows
}

/// Comma-separated, double-quote-escaped tokenizer
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvParser {
    strict: bool,
}

impl CsvParser {
    pub fn lenient() -> Self {
        Self { strict: false }
    }

    /// Reject input that ends inside a quoted field
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

impl Parser for CsvParser {
    fn format(&self) -> InputFormat {
        InputFormat::Csv
    }

    fn parse(&self, text: &str) -> Result<Vec<RawRow>> {
        debug!("CsvParser: start chars_len={}", text.len());
        let tokenized = tokenize(text);

        if tokenized.unterminated_quote {
            ParserMetrics::record_unterminated_quote();
            if self.strict {
                return Err(IngestError::malformed(
                    InputFormat::Csv,
                    "input ends inside a quoted field",
                ));
            }
            warn!("CsvParser: input ends inside a quoted field; treating the remainder as data");
        }

        debug!("CsvParser: produced rows={}", tokenized.rows.len());
        Ok(tokenized.rows)
    }
}
