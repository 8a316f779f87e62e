use super::base::{FieldReader, KindNormalizer, LastWins};
use crate::pipeline::processing::normalize::Normalized;
use crate::pipeline::processing::parser::Table;
use crate::types::{CanonicalDataset, DatasetKind, PopularityRecord};

/// One record per row, keyed by `author_id`; `texts` carry stance tags
#[derive(Debug, Default)]
pub struct PopularityNormalizer;

impl PopularityNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl KindNormalizer for PopularityNormalizer {
    fn normalize(&self, table: &Table<'_>) -> Normalized {
        let mut reader = FieldReader::new();
        let mut records = LastWins::new();

        for record in table.records() {
            let author_id = reader.text(&record, "author_id");
            let normalized = PopularityRecord {
                name: reader.text(&record, "name"),
                interactions: reader.count(&record, "interactions"),
                apoio: reader.amount(&record, "apoio"),
                neutralidade: reader.amount(&record, "neutralidade"),
                oposicao: reader.amount(&record, "oposicao"),
                texts: reader.tagged_texts(&record, "texts"),
                position: reader.position(&record),
                author_id: author_id.clone(),
            };
            records.insert(&author_id, normalized);
        }

        let duplicates = records.duplicates();
        Normalized {
            dataset: CanonicalDataset::Popularity(records.into_items()),
            warnings: reader.into_warnings(),
            duplicates,
        }
    }

    fn kind(&self) -> DatasetKind {
        DatasetKind::Popularity
    }

    fn name(&self) -> &str {
        "popularity"
    }
}
