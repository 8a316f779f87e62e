use std::collections::HashMap;

use super::RawRow;

/// Header-indexed view over tokenized rows
///
/// Row 0 is the header (cells trimmed). When a header name repeats, the
/// rightmost column wins.
#[derive(Debug, Clone)]
pub struct Table<'a> {
    headers: Vec<String>,
    index: HashMap<String, usize>,
    rows: &'a [RawRow],
}

impl<'a> Table<'a> {
    pub fn from_rows(rows: &'a [RawRow]) -> Self {
        let (headers, rows): (Vec<String>, &[RawRow]) = match rows.split_first() {
            Some((header, rest)) => (header.iter().map(|h| h.trim().to_string()).collect(), rest),
            None => (Vec::new(), rows),
        };

        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();

        Self {
            headers,
            index,
            rows,
        }
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Number of data rows (header excluded)
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn records(&self) -> impl Iterator<Item = Record<'_>> + '_ {
        self.rows.iter().enumerate().map(move |(i, cells)| Record {
            index: &self.index,
            cells,
            number: i + 1,
        })
    }
}

/// One data row projected onto the header
#[derive(Debug, Clone, Copy)]
pub struct Record<'t> {
    index: &'t HashMap<String, usize>,
    cells: &'t [String],
    number: usize,
}

impl<'t> Record<'t> {
    /// Cell under `field`; unknown columns and missing trailing cells read as ""
    pub fn get(&self, field: &str) -> &'t str {
        self.index
            .get(field)
            .and_then(|&i| self.cells.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// 1-based position among the data rows
    pub fn number(&self) -> usize {
        self.number
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::parser::parse_csv;

    #[test]
    fn cells_are_projected_by_trimmed_header() {
        let rows = parse_csv(" author_id , texts,interactions\n7,oi,3\n8,tchau\n");
        let table = Table::from_rows(&rows);
        assert_eq!(table.headers(), ["author_id", "texts", "interactions"]);
        assert_eq!(table.len(), 2);

        let records: Vec<_> = table.records().collect();
        assert_eq!(records[0].get("author_id"), "7");
        assert_eq!(records[0].get("interactions"), "3");
        assert_eq!(records[1].get("interactions"), "");
        assert_eq!(records[1].get("no_such_column"), "");
        assert_eq!(records[1].number(), 2);
    }

    #[test]
    fn repeated_header_uses_rightmost_column() {
        let rows = parse_csv("id,id\nfirst,second\n");
        let table = Table::from_rows(&rows);
        assert_eq!(table.records().next().unwrap().get("id"), "second");
    }

    #[test]
    fn empty_document_has_no_headers_or_records() {
        let rows: Vec<RawRow> = Vec::new();
        let table = Table::from_rows(&rows);
        assert!(table.headers().is_empty());
        assert!(table.is_empty());
        assert!(!table.has_column("author_id"));
    }
}
