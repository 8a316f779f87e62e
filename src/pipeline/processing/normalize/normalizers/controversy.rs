use std::collections::HashSet;

use super::base::{FieldReader, KindNormalizer};
use crate::pipeline::processing::normalize::Normalized;
use crate::pipeline::processing::parser::{Record, Table};
use crate::types::{CanonicalDataset, ControversyEdge, ControversyGraph, ControversyNode, DatasetKind};

/// Folds edge rows (`source_*`, `target_*`, edge columns) into a node set and an edge list
///
/// The first definition of a node id wins; later rows naming the same id
/// only contribute their edge. Edges are never deduplicated.
#[derive(Debug, Default)]
pub struct ControversyNormalizer;

impl ControversyNormalizer {
    pub fn new() -> Self {
        Self
    }

    fn endpoint(reader: &mut FieldReader, record: &Record<'_>, prefix: &str, id: String) -> ControversyNode {
        let field = |name: &str| format!("{}_{}", prefix, name);
        ControversyNode {
            id,
            label: reader.text(record, &field("label")),
            text: reader.text(record, &field("text")),
            apoio: reader.amount(record, &field("apoio")),
            oposicao: reader.amount(record, &field("oposicao")),
            neutralidade: reader.amount(record, &field("neutralidade")),
            total: reader.optional_amount(record, &field("total")),
        }
    }
}

impl KindNormalizer for ControversyNormalizer {
    fn normalize(&self, table: &Table<'_>) -> Normalized {
        let mut reader = FieldReader::new();
        let mut seen: HashSet<String> = HashSet::new();
        let mut graph = ControversyGraph::default();
        let mut duplicates = 0;

        for record in table.records() {
            let source = reader.text(&record, "source_id");
            let target = reader.text(&record, "target_id");

            for (prefix, id) in [("source", &source), ("target", &target)] {
                if id.is_empty() {
                    continue;
                }
                if seen.insert(id.clone()) {
                    graph
                        .nodes
                        .push(Self::endpoint(&mut reader, &record, prefix, id.clone()));
                } else {
                    duplicates += 1;
                }
            }

            graph.edges.push(ControversyEdge {
                source,
                target,
                relation: reader.text(&record, "relation"),
                color: reader.text(&record, "color"),
                text: reader.text(&record, "text"),
            });
        }

        Normalized {
            dataset: CanonicalDataset::Controversy(graph),
            warnings: reader.into_warnings(),
            duplicates,
        }
    }

    fn kind(&self) -> DatasetKind {
        DatasetKind::Controversy
    }

    fn name(&self) -> &str {
        "controversy"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::parser::parse_csv;

    const HEADER: &str = "source_id,source_label,source_text,source_apoio,source_oposicao,source_neutralidade,source_total,\
target_id,target_label,target_text,target_apoio,target_oposicao,target_neutralidade,target_total,relation,color,text\n";

    fn graph(body: &str) -> (ControversyGraph, Normalized) {
        let rows = parse_csv(&format!("{HEADER}{body}"));
        let normalized = ControversyNormalizer::new().normalize(&Table::from_rows(&rows));
        match &normalized.dataset {
            CanonicalDataset::Controversy(graph) => (graph.clone(), normalized),
            other => panic!("unexpected dataset {other:?}"),
        }
    }

    #[test]
    fn rows_fold_into_nodes_and_edges() {
        let (graph, normalized) = graph(
            "m1,Primeira,texto 1,3,1,0,,m2,Segunda,texto 2,0,2,2,10,resposta,#f00,concordo\n",
        );
        assert_eq!(graph.nodes.len(), 2);
        let m1 = graph.node("m1").unwrap();
        assert_eq!((m1.apoio, m1.oposicao, m1.neutralidade), (3.0, 1.0, 0.0));
        assert_eq!(m1.total, None);
        assert_eq!(m1.effective_total(), 4.0);
        assert_eq!(graph.node("m2").unwrap().effective_total(), 10.0);

        assert_eq!(
            graph.edges,
            vec![ControversyEdge {
                source: "m1".into(),
                target: "m2".into(),
                relation: "resposta".into(),
                color: "#f00".into(),
                text: "concordo".into(),
            }]
        );
        assert!(normalized.warnings.is_empty());
    }

    #[test]
    fn first_node_definition_wins() {
        let (graph, normalized) = graph(
            "m1,Original,a,1,0,0,,m2,B,b,0,0,0,,r,,\n\
             m1,Redefined,z,9,9,9,99,m3,C,c,0,0,0,,r,,\n",
        );
        let m1 = graph.node("m1").unwrap();
        assert_eq!(m1.label, "Original");
        assert_eq!(m1.apoio, 1.0);
        assert_eq!(m1.total, None);
        let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["m1", "m2", "m3"]);
        assert_eq!(normalized.duplicates, 1);
    }

    #[test]
    fn repeated_edges_are_kept() {
        let (graph, _) = graph(
            "m1,A,,,,,,m2,B,,,,,,r,,\n\
             m1,A,,,,,,m2,B,,,,,,r,,\n",
        );
        assert_eq!(graph.nodes.len(), 2);
        assert_eq!(graph.edges.len(), 2);
        assert_eq!(graph.edges[0], graph.edges[1]);
    }

    #[test]
    fn empty_endpoint_keeps_edge_without_node() {
        let (graph, _) = graph("m1,A,,,,,,,,,,,,,r,,\n");
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.edges[0].target, "");
    }

    #[test]
    fn dirty_counts_warn_and_default() {
        let (graph, normalized) = graph("m1,A,,x,,,nope,m2,B,,,,,,r,,\n");
        let m1 = graph.node("m1").unwrap();
        assert_eq!(m1.apoio, 0.0);
        assert_eq!(m1.total, None);
        assert_eq!(normalized.warnings.len(), 2);
    }

    #[test]
    fn header_without_node_columns_still_yields_edges() {
        let rows = parse_csv("relation\nr\n");
        let normalized = ControversyNormalizer::new().normalize(&Table::from_rows(&rows));
        let CanonicalDataset::Controversy(graph) = normalized.dataset else {
            panic!("wrong kind")
        };
        assert!(graph.nodes.is_empty());
        assert_eq!(graph.edges.len(), 1);
    }
}
