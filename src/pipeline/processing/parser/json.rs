use serde_json::Value;
use tracing::debug;

use crate::error::{IngestError, Result};
use crate::types::{CanonicalDataset, ControversyGraph, DatasetKind, InputFormat};

/// Parse JSON text; syntax errors surface as `MalformedSyntax`
pub fn parse_json(text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|e| IngestError::malformed(InputFormat::Json, e.to_string()))
}

/// Whether `value` is an array whose every element is an object
fn is_object_list(value: &Value) -> bool {
    value
        .as_array()
        .is_some_and(|items| items.iter().all(Value::is_object))
}

/// The JSON shape each kind expects. A `null` or missing `nodes`/`edges` key
/// passes here and is reported as a missing field by schema validation.
pub fn check_shape(kind: DatasetKind, value: &Value) -> Result<()> {
    let ok = match kind {
        DatasetKind::Participation | DatasetKind::Popularity => is_object_list(value),
        DatasetKind::Controversy => value.as_object().is_some_and(|obj| {
            ["nodes", "edges"]
                .iter()
                .filter_map(|key| obj.get(*key))
                .all(|list| list.is_null() || is_object_list(list))
        }),
    };
    if ok {
        Ok(())
    } else {
        Err(IngestError::UnexpectedShape {
            kind,
            expected: expected_shape(kind),
        })
    }
}

fn expected_shape(kind: DatasetKind) -> &'static str {
    match kind {
        DatasetKind::Participation | DatasetKind::Popularity => "a JSON array of objects",
        DatasetKind::Controversy => "a JSON object with `nodes` and `edges` arrays of objects",
    }
}

/// Read an already-canonical JSON document into its typed shape.
///
/// JSON skips row reconstruction; only the lenient field coercions apply.
pub fn decode(kind: DatasetKind, value: Value) -> Result<CanonicalDataset> {
    check_shape(kind, &value)?;
    let malformed = |e: serde_json::Error| IngestError::malformed(InputFormat::Json, e.to_string());

    let dataset = match kind {
        DatasetKind::Participation => {
            CanonicalDataset::Participation(serde_json::from_value(value).map_err(malformed)?)
        }
        DatasetKind::Popularity => {
            CanonicalDataset::Popularity(serde_json::from_value(value).map_err(malformed)?)
        }
        DatasetKind::Controversy => {
            let graph: ControversyGraph = serde_json::from_value(value).map_err(malformed)?;
            CanonicalDataset::Controversy(graph)
        }
    };
    debug!("decoded {} JSON dataset with {} entries", kind, dataset.len());
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Stance;
    use serde_json::json;

    #[test]
    fn invalid_json_is_malformed_syntax() {
        let err = parse_json("[{\"author_id\": 1,}").unwrap_err();
        assert!(matches!(err, IngestError::MalformedSyntax { format: InputFormat::Json, .. }));
    }

    #[test]
    fn list_kinds_need_an_array() {
        let err = decode(DatasetKind::Popularity, json!({"author_id": "a"})).unwrap_err();
        assert!(matches!(err, IngestError::UnexpectedShape { kind: DatasetKind::Popularity, .. }));
        let err = decode(DatasetKind::Controversy, json!([])).unwrap_err();
        assert!(matches!(err, IngestError::UnexpectedShape { .. }));
    }

    #[test]
    fn popularity_json_decodes_with_stance_tags() {
        let ds = decode(
            DatasetKind::Popularity,
            json!([{
                "author_id": "u1",
                "name": "Ana",
                "interactions": 4,
                "apoio": 3,
                "neutralidade": 1,
                "texts": [{"text": "boa", "type": "apoio"}, {"text": "ok"}],
                "position": {"x": 10, "y": -20.5}
            }]),
        )
        .unwrap();

        let CanonicalDataset::Popularity(records) = ds else { panic!("wrong kind") };
        let r = &records[0];
        assert_eq!(r.oposicao, 0.0);
        assert_eq!(r.texts[0].stance, Stance::Support);
        assert_eq!(r.texts[1].stance, Stance::Neutral);
        assert_eq!(r.position.unwrap().y, -20.5);
    }

    #[test]
    fn controversy_json_keeps_dangling_edges() {
        let ds = decode(
            DatasetKind::Controversy,
            json!({
                "nodes": [{"id": "m1", "label": "first"}],
                "edges": [{"source": "m1", "target": "ghost"}]
            }),
        )
        .unwrap();
        let CanonicalDataset::Controversy(graph) = ds else { panic!("wrong kind") };
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.edges[0].target, "ghost");
    }

    #[test]
    fn non_array_nodes_is_the_wrong_shape() {
        let err = decode(DatasetKind::Controversy, json!({"nodes": 5, "edges": []})).unwrap_err();
        assert!(matches!(err, IngestError::UnexpectedShape { kind: DatasetKind::Controversy, .. }));
        let err = decode(DatasetKind::Controversy, json!({"nodes": [], "edges": [1]})).unwrap_err();
        assert!(matches!(err, IngestError::UnexpectedShape { .. }));
    }

    #[test]
    fn list_elements_must_all_be_objects() {
        let value = json!([{"author_id": 1, "texts": []}, 5]);
        assert!(check_shape(DatasetKind::Participation, &value).is_err());
        assert!(check_shape(DatasetKind::Participation, &json!([])).is_ok());
    }

    #[test]
    fn null_lists_are_left_for_field_checks() {
        assert!(check_shape(DatasetKind::Controversy, &json!({"nodes": null, "edges": []})).is_ok());
        assert!(check_shape(DatasetKind::Controversy, &json!({})).is_ok());
    }
}
