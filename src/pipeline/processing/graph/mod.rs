//! GraphModelBuilder: canonical datasets into renderable nodes and edges.

pub mod color;
pub mod pie;

pub use color::color_from_id;
pub use pie::{format_percentage, PieChart, PieSlice};

use std::collections::HashSet;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::{Config, SizingConfig};
use crate::constants::{DEFAULT_EDGE_COLOR, SCATTER_EXTENT, STANCE_NEUTRAL, UNNAMED_NODE_PREFIX};
use crate::metrics::GraphMetrics;
use crate::types::{
    CanonicalDataset, ControversyEdge, ControversyGraph, DatasetKind, ParticipationRecord,
    PopularityRecord, Position, TaggedText,
};

/// Per-kind payload shown alongside a node
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NodeDetails {
    Participation {
        interactions: u64,
        texts: Vec<String>,
    },
    Popularity {
        name: String,
        interactions: u64,
        texts: Vec<TaggedText>,
    },
    Controversy {
        text: String,
        total: f64,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualNode {
    pub id: String,
    pub label: String,
    pub color: String,
    pub size: f64,
    /// Absent for controversy graphs, which the renderer lays out itself
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Position>,
    /// Whether `position` was scattered at build time rather than supplied
    pub position_synthesized: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pie: Option<PieChart>,
    pub details: NodeDetails,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VisualEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    pub relation: String,
    pub color: String,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MostConnected {
    pub id: String,
    pub label: String,
    pub degree: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphSummary {
    pub node_count: usize,
    pub edge_count: usize,
    /// Sum of `interactions` (participation and popularity)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_interactions: Option<u64>,
    /// Highest-degree node of a controversy graph
    #[serde(skip_serializing_if = "Option::is_none")]
    pub most_connected: Option<MostConnected>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphModel {
    pub kind: DatasetKind,
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
    pub summary: GraphSummary,
}

impl GraphModel {
    pub fn node(&self, id: &str) -> Option<&VisualNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Edges whose source or target names no node; kept in the model as-is
    pub fn dangling_edges(&self) -> Vec<&VisualEdge> {
        let ids = self.node_ids();
        self.edges
            .iter()
            .filter(|e| !ids.contains(e.source.as_str()) || !ids.contains(e.target.as_str()))
            .collect()
    }

    /// Resolved edges touching `id`, self-loops excluded
    pub fn degree(&self, id: &str) -> usize {
        degree(&self.node_ids(), &self.edges, id)
    }

    fn node_ids(&self) -> HashSet<&str> {
        self.nodes.iter().map(|n| n.id.as_str()).collect()
    }
}

fn degree(ids: &HashSet<&str>, edges: &[VisualEdge], id: &str) -> usize {
    edges
        .iter()
        .filter(|e| e.source != e.target)
        .filter(|e| ids.contains(e.source.as_str()) && ids.contains(e.target.as_str()))
        .filter(|e| e.source == id || e.target == id)
        .count()
}

/// Node id: the record's id, or its index when the id is empty
fn node_id(id: &str, idx: usize) -> String {
    if id.is_empty() {
        idx.to_string()
    } else {
        id.to_string()
    }
}

fn node_label(label: &str, idx: usize) -> String {
    if label.is_empty() {
        format!("{}{}", UNNAMED_NODE_PREFIX, idx)
    } else {
        label.to_string()
    }
}

fn or_default(value: &str, default: &str) -> String {
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

pub struct GraphModelBuilder {
    sizing: SizingConfig,
    scatter_extent: f64,
}

impl Default for GraphModelBuilder {
    fn default() -> Self {
        Self {
            sizing: SizingConfig::default(),
            scatter_extent: SCATTER_EXTENT,
        }
    }
}

impl GraphModelBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            sizing: config.sizing.clone(),
            scatter_extent: config.layout.scatter_extent,
        }
    }

    /// Build with a seeded generator when `seed` is given, otherwise with
    /// the thread-local one (positions differ on every run)
    pub fn build_seeded(&self, dataset: &CanonicalDataset, seed: Option<u64>) -> GraphModel {
        match seed {
            Some(seed) => self.build(dataset, &mut StdRng::seed_from_u64(seed)),
            None => self.build(dataset, &mut rand::thread_rng()),
        }
    }

    /// `rng` is only consulted for records without a supplied position
    pub fn build<R: Rng>(&self, dataset: &CanonicalDataset, rng: &mut R) -> GraphModel {
        let kind = dataset.kind();
        debug!("building {} graph from {} entries", kind, dataset.len());

        let model = match dataset {
            CanonicalDataset::Participation(records) => self.participation(records, rng),
            CanonicalDataset::Popularity(records) => self.popularity(records, rng),
            CanonicalDataset::Controversy(graph) => self.controversy(graph),
        };

        let synthesized = model.nodes.iter().filter(|n| n.position_synthesized).count();
        let dangling = model.dangling_edges().len();
        if dangling > 0 {
            warn!("{} graph has {} edge(s) with unresolved endpoints", kind, dangling);
            GraphMetrics::record_dangling_edges(dangling);
        }
        GraphMetrics::record_synthesized_positions(synthesized);
        GraphMetrics::record_built(model.nodes.len(), model.edges.len());

        info!(
            "built {} graph: {} nodes, {} edges, {} synthesized positions",
            kind,
            model.nodes.len(),
            model.edges.len(),
            synthesized
        );
        model
    }

    fn place<R: Rng>(&self, supplied: Option<Position>, rng: &mut R) -> (Position, bool) {
        match supplied {
            Some(position) => (position, false),
            None => {
                let extent = self.scatter_extent;
                let position = Position {
                    x: rng.gen_range(-extent..=extent),
                    y: rng.gen_range(-extent..=extent),
                };
                (position, true)
            }
        }
    }

    fn participation<R: Rng>(&self, records: &[ParticipationRecord], rng: &mut R) -> GraphModel {
        let sizing = self.sizing.for_kind(DatasetKind::Participation);
        let nodes: Vec<VisualNode> = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let id = node_id(&record.author_id, idx);
                let (position, synthesized) = self.place(record.position, rng);
                VisualNode {
                    label: node_label(&record.author_id, idx),
                    color: color_from_id(&id),
                    size: sizing.size_for(record.interactions),
                    position: Some(position),
                    position_synthesized: synthesized,
                    pie: None,
                    details: NodeDetails::Participation {
                        interactions: record.interactions,
                        texts: record.texts.clone(),
                    },
                    id,
                }
            })
            .collect();

        let total: u64 = records.iter().map(|r| r.interactions).sum();
        Self::assemble(DatasetKind::Participation, nodes, Vec::new(), Some(total))
    }

    fn popularity<R: Rng>(&self, records: &[PopularityRecord], rng: &mut R) -> GraphModel {
        let sizing = self.sizing.for_kind(DatasetKind::Popularity);
        let nodes: Vec<VisualNode> = records
            .iter()
            .enumerate()
            .map(|(idx, record)| {
                let id = node_id(&record.author_id, idx);
                let (position, synthesized) = self.place(record.position, rng);
                VisualNode {
                    label: node_label(&record.author_id, idx),
                    color: color_from_id(&id),
                    size: sizing.size_for(record.interactions),
                    position: Some(position),
                    position_synthesized: synthesized,
                    pie: Some(PieChart::from_counts(
                        record.apoio,
                        record.neutralidade,
                        record.oposicao,
                    )),
                    details: NodeDetails::Popularity {
                        name: record.name.clone(),
                        interactions: record.interactions,
                        texts: record.texts.clone(),
                    },
                    id,
                }
            })
            .collect();

        let total: u64 = records.iter().map(|r| r.interactions).sum();
        Self::assemble(DatasetKind::Popularity, nodes, Vec::new(), Some(total))
    }

    fn controversy(&self, graph: &ControversyGraph) -> GraphModel {
        let sizing = self.sizing.for_kind(DatasetKind::Controversy);
        let nodes: Vec<VisualNode> = graph
            .nodes
            .iter()
            .enumerate()
            .map(|(idx, node)| {
                let id = node_id(&node.id, idx);
                VisualNode {
                    label: node_label(&node.label, idx),
                    color: color_from_id(&id),
                    size: sizing.size_for(0),
                    position: None,
                    position_synthesized: false,
                    pie: Some(PieChart::from_counts(node.apoio, node.neutralidade, node.oposicao)),
                    details: NodeDetails::Controversy {
                        text: node.text.clone(),
                        total: node.effective_total(),
                    },
                    id,
                }
            })
            .collect();

        let edges = graph.edges.iter().map(visual_edge).collect();
        Self::assemble(DatasetKind::Controversy, nodes, edges, None)
    }

    fn assemble(
        kind: DatasetKind,
        nodes: Vec<VisualNode>,
        edges: Vec<VisualEdge>,
        total_interactions: Option<u64>,
    ) -> GraphModel {
        let most_connected = match kind {
            DatasetKind::Controversy => most_connected(&nodes, &edges),
            _ => None,
        };
        let summary = GraphSummary {
            node_count: nodes.len(),
            edge_count: edges.len(),
            total_interactions,
            most_connected,
        };
        GraphModel {
            kind,
            nodes,
            edges,
            summary,
        }
    }
}

fn visual_edge(edge: &ControversyEdge) -> VisualEdge {
    VisualEdge {
        id: format!("{}_{}", edge.source, edge.target),
        source: edge.source.clone(),
        target: edge.target.clone(),
        relation: or_default(&edge.relation, STANCE_NEUTRAL),
        color: or_default(&edge.color, DEFAULT_EDGE_COLOR),
        text: edge.text.clone(),
    }
}

/// First node in order among those with the highest degree
fn most_connected(nodes: &[VisualNode], edges: &[VisualEdge]) -> Option<MostConnected> {
    let ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let mut best: Option<MostConnected> = None;
    for node in nodes {
        let d = degree(&ids, edges, &node.id);
        if best.as_ref().map_or(true, |b| d > b.degree) {
            best = Some(MostConnected {
                id: node.id.clone(),
                label: node.label.clone(),
                degree: d,
            });
        }
    }
    best
}
