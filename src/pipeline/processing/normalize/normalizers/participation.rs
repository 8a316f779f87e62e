use super::base::{FieldReader, KindNormalizer, LastWins};
use crate::pipeline::processing::normalize::Normalized;
use crate::pipeline::processing::parser::Table;
use crate::types::{CanonicalDataset, DatasetKind, ParticipationRecord};

/// One record per row, keyed by `author_id`
#[derive(Debug, Default)]
pub struct ParticipationNormalizer;

impl ParticipationNormalizer {
    pub fn new() -> Self {
        Self
    }
}

impl KindNormalizer for ParticipationNormalizer {
    fn normalize(&self, table: &Table<'_>) -> Normalized {
        let mut reader = FieldReader::new();
        let mut records = LastWins::new();

        for record in table.records() {
            let author_id = reader.text(&record, "author_id");
            let normalized = ParticipationRecord {
                interactions: reader.count(&record, "interactions"),
                texts: reader.texts(&record, "texts"),
                position: reader.position(&record),
                author_id: author_id.clone(),
            };
            records.insert(&author_id, normalized);
        }

        let duplicates = records.duplicates();
        Normalized {
            dataset: CanonicalDataset::Participation(records.into_items()),
            warnings: reader.into_warnings(),
            duplicates,
        }
    }

    fn kind(&self) -> DatasetKind {
        DatasetKind::Participation
    }

    fn name(&self) -> &str {
        "participation"
    }
}
