use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::coerce::lenient;
use crate::constants;
use crate::error::IngestError;

/// The three dataset shapes the system understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DatasetKind {
    Participation,
    Controversy,
    Popularity,
}

impl DatasetKind {
    pub const ALL: [DatasetKind; 3] = [
        DatasetKind::Participation,
        DatasetKind::Controversy,
        DatasetKind::Popularity,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DatasetKind::Participation => constants::PARTICIPATION,
            DatasetKind::Controversy => constants::CONTROVERSY,
            DatasetKind::Popularity => constants::POPULARITY,
        }
    }
}

impl fmt::Display for DatasetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DatasetKind {
    type Err = IngestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            constants::PARTICIPATION | constants::PARTICIPATION_ALIAS => {
                Ok(DatasetKind::Participation)
            }
            constants::CONTROVERSY | constants::CONTROVERSY_ALIAS => Ok(DatasetKind::Controversy),
            constants::POPULARITY | constants::POPULARITY_ALIAS => Ok(DatasetKind::Popularity),
            _ => Err(IngestError::UnknownKind(s.to_string())),
        }
    }
}

/// Serialization an uploaded file arrives in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    Csv,
    Json,
}

impl InputFormat {
    /// Pick the format from a file extension (case-insensitive)
    pub fn from_path(path: &Path) -> Result<Self, IngestError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_lowercase())
            .unwrap_or_default();
        match ext.as_str() {
            "csv" => Ok(InputFormat::Csv),
            "json" => Ok(InputFormat::Json),
            _ => Err(IngestError::UnsupportedFormat(path.display().to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::Csv => "csv",
            InputFormat::Json => "json",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Stance of a message toward the topic. Declaration order is pie-slice order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String")]
pub enum Stance {
    #[serde(rename = "apoio")]
    Support,
    #[default]
    #[serde(rename = "neutralidade")]
    Neutral,
    #[serde(rename = "oposicao")]
    Opposition,
}

impl Stance {
    pub const ORDER: [Stance; 3] = [Stance::Support, Stance::Neutral, Stance::Opposition];

    /// Match a tag such as `apoio` or `OPOSICAO`; anything else is `None`
    pub fn from_tag(tag: &str) -> Option<Stance> {
        match tag.trim().to_lowercase().as_str() {
            constants::STANCE_SUPPORT => Some(Stance::Support),
            constants::STANCE_NEUTRAL => Some(Stance::Neutral),
            constants::STANCE_OPPOSITION => Some(Stance::Opposition),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            Stance::Support => constants::STANCE_SUPPORT,
            Stance::Neutral => constants::STANCE_NEUTRAL,
            Stance::Opposition => constants::STANCE_OPPOSITION,
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            Stance::Support => constants::SUPPORT_COLOR,
            Stance::Neutral => constants::NEUTRAL_COLOR,
            Stance::Opposition => constants::OPPOSITION_COLOR,
        }
    }
}

impl From<String> for Stance {
    fn from(tag: String) -> Self {
        Stance::from_tag(&tag).unwrap_or_default()
    }
}

impl fmt::Display for Stance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f64,
    pub y: f64,
}

/// One author's activity in a participation dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipationRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub author_id: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub interactions: u64,
    #[serde(default, deserialize_with = "lenient::texts")]
    pub texts: Vec<String>,
    #[serde(
        default,
        deserialize_with = "lenient::position",
        skip_serializing_if = "Option::is_none"
    )]
    pub position: Option<Position>,
}

/// A message with the stance it was classified under
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaggedText {
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: String,
    #[serde(rename = "type", default, deserialize_with = "lenient::stance")]
    pub stance: Stance,
}

/// One author's reception in a popularity dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopularityRecord {
    #[serde(default, deserialize_with = "lenient::string")]
    pub author_id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient::count")]
    pub interactions: u64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub apoio: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub neutralidade: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub oposicao: f64,
    #[serde(default, deserialize_with = "lenient::tagged_texts")]
    pub texts: Vec<TaggedText>,
    #[serde(
        default,
        deserialize_with = "lenient::position",
        skip_serializing_if = "Option::is_none"
    )]
    pub position: Option<Position>,
}

/// A message node in a controversy graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControversyNode {
    #[serde(default, deserialize_with = "lenient::string")]
    pub id: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub label: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub apoio: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub oposicao: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    pub neutralidade: f64,
    /// Supplied total; when absent the node's total is the sum of its counts
    #[serde(
        default,
        deserialize_with = "lenient::optional_amount",
        skip_serializing_if = "Option::is_none"
    )]
    pub total: Option<f64>,
}

impl ControversyNode {
    pub fn counts_sum(&self) -> f64 {
        self.apoio + self.neutralidade + self.oposicao
    }

    pub fn effective_total(&self) -> f64 {
        self.total.unwrap_or_else(|| self.counts_sum())
    }
}

/// A reply/quote relation between two messages
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ControversyEdge {
    #[serde(default, deserialize_with = "lenient::string")]
    pub source: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub target: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub relation: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub color: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ControversyGraph {
    #[serde(default)]
    pub nodes: Vec<ControversyNode>,
    #[serde(default)]
    pub edges: Vec<ControversyEdge>,
}

impl ControversyGraph {
    pub fn node(&self, id: &str) -> Option<&ControversyNode> {
        self.nodes.iter().find(|n| n.id == id)
    }
}

/// A normalized dataset, independent of the file format it came from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "data", rename_all = "snake_case")]
pub enum CanonicalDataset {
    Participation(Vec<ParticipationRecord>),
    Controversy(ControversyGraph),
    Popularity(Vec<PopularityRecord>),
}

impl CanonicalDataset {
    pub fn kind(&self) -> DatasetKind {
        match self {
            CanonicalDataset::Participation(_) => DatasetKind::Participation,
            CanonicalDataset::Controversy(_) => DatasetKind::Controversy,
            CanonicalDataset::Popularity(_) => DatasetKind::Popularity,
        }
    }

    /// Records for the list kinds, nodes for a controversy graph
    pub fn len(&self) -> usize {
        match self {
            CanonicalDataset::Participation(records) => records.len(),
            CanonicalDataset::Controversy(graph) => graph.nodes.len(),
            CanonicalDataset::Popularity(records) => records.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
