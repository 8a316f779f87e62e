//! Canonical datasets back into the kind-specific CSV shape.
//!
//! The output reads back through the lenient tokenizer and the normalizers
//! with these losses:
//! - text segments come back trimmed, and a text containing ` | ` splits in two
//! - an empty text list and a list of one empty text both come back empty
//! - controversy nodes no edge references are dropped; the rest come back in
//!   first-appearance order across edge rows
//! - an edge endpoint that names no node comes back as a node with empty
//!   label and zero counts
//! - a repeated participation/popularity id collapses to its last record

use std::collections::HashMap;

use tracing::debug;

use crate::constants::{
    CONTROVERSY_EDGE_COLUMNS, CONTROVERSY_NODE_COLUMNS, PARTICIPATION_COLUMNS, POPULARITY_COLUMNS,
    TEXT_SEPARATOR,
};
use crate::types::{
    CanonicalDataset, ControversyGraph, ControversyNode, ParticipationRecord, PopularityRecord,
    Position, TaggedText,
};

/// Quote a cell the way the tokenizer reads it back: quotes are always
/// doubled, and the cell is wrapped only when it holds a delimiter
pub fn escape_cell(value: &str) -> String {
    let escaped = value.replace('"', "\"\"");
    if value.contains([',', '\n', '\r']) {
        format!("\"{}\"", escaped)
    } else {
        escaped
    }
}

fn write_row<S: AsRef<str>>(out: &mut String, cells: &[S]) {
    let line: Vec<String> = cells.iter().map(|c| escape_cell(c.as_ref())).collect();
    out.push_str(&line.join(","));
    out.push('\n');
}

fn coordinates(position: Option<Position>) -> [String; 2] {
    match position {
        Some(p) => [p.x.to_string(), p.y.to_string()],
        None => [String::new(), String::new()],
    }
}

fn tagged(texts: &[TaggedText]) -> String {
    texts
        .iter()
        .map(|t| format!("{}({})", t.text, t.stance.tag()))
        .collect::<Vec<_>>()
        .join(TEXT_SEPARATOR)
}

pub fn to_csv(dataset: &CanonicalDataset) -> String {
    let csv = match dataset {
        CanonicalDataset::Participation(records) => participation_csv(records),
        CanonicalDataset::Popularity(records) => popularity_csv(records),
        CanonicalDataset::Controversy(graph) => controversy_csv(graph),
    };
    debug!("exported {} dataset as {} bytes of CSV", dataset.kind(), csv.len());
    csv
}

fn participation_csv(records: &[ParticipationRecord]) -> String {
    let mut out = String::new();
    write_row(&mut out, PARTICIPATION_COLUMNS);
    for r in records {
        let [x, y] = coordinates(r.position);
        write_row(
            &mut out,
            &[
                r.author_id.clone(),
                r.interactions.to_string(),
                r.texts.join(TEXT_SEPARATOR),
                x,
                y,
            ],
        );
    }
    out
}

fn popularity_csv(records: &[PopularityRecord]) -> String {
    let mut out = String::new();
    write_row(&mut out, POPULARITY_COLUMNS);
    for r in records {
        let [x, y] = coordinates(r.position);
        write_row(
            &mut out,
            &[
                r.author_id.clone(),
                r.name.clone(),
                r.interactions.to_string(),
                r.apoio.to_string(),
                r.neutralidade.to_string(),
                r.oposicao.to_string(),
                tagged(&r.texts),
                x,
                y,
            ],
        );
    }
    out
}

fn endpoint_cells(id: &str, node: Option<&ControversyNode>) -> Vec<String> {
    match node {
        Some(n) => vec![
            n.id.clone(),
            n.label.clone(),
            n.text.clone(),
            n.apoio.to_string(),
            n.oposicao.to_string(),
            n.neutralidade.to_string(),
            n.total.map(|t| t.to_string()).unwrap_or_default(),
        ],
        None => {
            let mut cells = vec![String::new(); CONTROVERSY_NODE_COLUMNS.len()];
            cells[0] = id.to_string();
            cells
        }
    }
}

fn controversy_csv(graph: &ControversyGraph) -> String {
    let mut header: Vec<String> = Vec::new();
    for prefix in ["source", "target"] {
        header.extend(CONTROVERSY_NODE_COLUMNS.iter().map(|c| format!("{}_{}", prefix, c)));
    }
    header.extend(CONTROVERSY_EDGE_COLUMNS.iter().map(|c| c.to_string()));

    // First definition of an id wins, matching how rows are folded back
    let mut nodes: HashMap<&str, &ControversyNode> = HashMap::new();
    for node in &graph.nodes {
        nodes.entry(node.id.as_str()).or_insert(node);
    }

    let mut out = String::new();
    write_row(&mut out, &header);
    for edge in &graph.edges {
        let mut cells = endpoint_cells(&edge.source, nodes.get(edge.source.as_str()).copied());
        cells.extend(endpoint_cells(&edge.target, nodes.get(edge.target.as_str()).copied()));
        cells.extend([edge.relation.clone(), edge.color.clone(), edge.text.clone()]);
        write_row(&mut out, &cells);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::processing::normalize::normalize;
    use crate::pipeline::processing::parser::parse_csv;
    use crate::types::{ControversyEdge, DatasetKind, Stance};

    fn round_trip(dataset: &CanonicalDataset) -> CanonicalDataset {
        let csv = to_csv(dataset);
        let normalized = normalize(dataset.kind(), &parse_csv(&csv));
        assert!(normalized.warnings.is_empty(), "{:?}", normalized.warnings);
        normalized.dataset
    }

    #[test]
    fn cells_are_quoted_only_around_delimiters() {
        assert_eq!(escape_cell("plain"), "plain");
        assert_eq!(escape_cell("a,b"), "\"a,b\"");
        assert_eq!(escape_cell("line\nbreak"), "\"line\nbreak\"");
        assert_eq!(escape_cell("say \"hi\""), "say \"\"hi\"\"");
        assert_eq!(escape_cell("\"q\", too"), "\"\"\"q\"\", too\"");
        assert_eq!(escape_cell(""), "");
    }

    #[test]
    fn escaped_cells_tokenize_back_unchanged() {
        let values = ["a,b", "say \"hi\"", "\"", "x\r\ny", "trailing\"", "\"q\", too", " spaced "];
        let line: Vec<String> = values.iter().map(|v| escape_cell(v)).collect();
        let rows = parse_csv(&line.join(","));
        assert_eq!(rows, vec![values.iter().map(|v| v.to_string()).collect::<Vec<_>>()]);
    }

    #[test]
    fn participation_round_trips() {
        let dataset = CanonicalDataset::Participation(vec![
            ParticipationRecord {
                author_id: "u1".into(),
                interactions: 12,
                texts: vec!["oi, tudo bem?".into(), "ele disse \"não\"".into()],
                position: Some(Position { x: 10.25, y: -3.0 }),
            },
            ParticipationRecord {
                author_id: "u2".into(),
                interactions: 0,
                texts: vec![],
                position: None,
            },
        ]);
        assert_eq!(round_trip(&dataset), dataset);
    }

    #[test]
    fn popularity_round_trips_with_tags() {
        let dataset = CanonicalDataset::Popularity(vec![PopularityRecord {
            author_id: "u1".into(),
            name: "Silva, Ana".into(),
            interactions: 4,
            apoio: 2.5,
            neutralidade: 1.0,
            oposicao: 0.0,
            texts: vec![
                TaggedText { text: "boa (mesmo)".into(), stance: Stance::Support },
                TaggedText { text: "hm".into(), stance: Stance::Neutral },
                TaggedText { text: "não".into(), stance: Stance::Opposition },
            ],
            position: Some(Position { x: 0.0, y: 0.0 }),
        }]);
        assert_eq!(round_trip(&dataset), dataset);
    }

    #[test]
    fn controversy_round_trips_referenced_nodes() {
        let node = |id: &str, total: Option<f64>| ControversyNode {
            id: id.into(),
            label: format!("label {id}"),
            text: format!("texto, de {id}"),
            apoio: 1.0,
            oposicao: 2.0,
            neutralidade: 0.5,
            total,
        };
        let edge = |s: &str, t: &str| ControversyEdge {
            source: s.into(),
            target: t.into(),
            relation: "resposta".into(),
            color: "#123456".into(),
            text: String::new(),
        };
        let dataset = CanonicalDataset::Controversy(ControversyGraph {
            nodes: vec![node("m1", None), node("m2", Some(7.0)), node("m3", None)],
            edges: vec![edge("m1", "m2"), edge("m2", "m3"), edge("m1", "m2")],
        });
        assert_eq!(round_trip(&dataset), dataset);
    }

    #[test]
    fn controversy_export_drops_unreferenced_nodes_and_materializes_dangling_ones() {
        let dataset = CanonicalDataset::Controversy(ControversyGraph {
            nodes: vec![
                ControversyNode {
                    id: "lonely".into(),
                    label: String::new(),
                    text: String::new(),
                    apoio: 0.0,
                    oposicao: 0.0,
                    neutralidade: 0.0,
                    total: None,
                },
            ],
            edges: vec![ControversyEdge {
                source: "a".into(),
                target: "b".into(),
                relation: String::new(),
                color: String::new(),
                text: String::new(),
            }],
        });
        let CanonicalDataset::Controversy(back) = round_trip(&dataset) else {
            panic!("wrong kind")
        };
        let ids: Vec<_> = back.nodes.iter().map(|n| n.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b"]);
        assert_eq!(back.node("a").unwrap().effective_total(), 0.0);
    }

    #[test]
    fn header_matches_column_set() {
        let csv = to_csv(&CanonicalDataset::Popularity(vec![]));
        assert_eq!(csv, "author_id,name,interactions,apoio,neutralidade,oposicao,texts,x,y\n");
        let csv = to_csv(&CanonicalDataset::Controversy(ControversyGraph::default()));
        assert!(csv.starts_with("source_id,source_label,"));
        assert!(csv.trim_end().ends_with("target_total,relation,color,text"));
        assert_eq!(DatasetKind::Controversy, CanonicalDataset::Controversy(ControversyGraph::default()).kind());
    }
}
