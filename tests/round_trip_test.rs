use std::path::PathBuf;

use vsion::{normalize, parse_csv, to_csv, CanonicalDataset, DatasetKind, Handoff, HandoffStore, Pipeline};

fn resource(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("resources")
        .join(name)
}

async fn ingest(kind: DatasetKind, name: &str) -> CanonicalDataset {
    Pipeline::default()
        .ingest_file(kind, resource(name))
        .await
        .unwrap()
        .dataset
}

fn reparse(dataset: &CanonicalDataset) -> CanonicalDataset {
    normalize(dataset.kind(), &parse_csv(&to_csv(dataset))).dataset
}

#[tokio::test]
async fn participation_csv_survives_export() {
    let dataset = ingest(DatasetKind::Participation, "participacao.csv").await;
    assert_eq!(reparse(&dataset), dataset);
}

#[tokio::test]
async fn popularity_csv_survives_export() {
    let dataset = ingest(DatasetKind::Popularity, "popularidade.csv").await;
    assert_eq!(reparse(&dataset), dataset);
}

#[tokio::test]
async fn controversy_csv_survives_export() {
    let dataset = ingest(DatasetKind::Controversy, "polemica.csv").await;
    assert_eq!(reparse(&dataset), dataset);
}

#[tokio::test]
async fn popularity_json_converts_to_the_same_records_as_csv() {
    let dataset = ingest(DatasetKind::Popularity, "popularidade.json").await;
    assert_eq!(reparse(&dataset), dataset);
}

#[tokio::test]
async fn controversy_json_export_materializes_dangling_endpoints() {
    let dataset = ingest(DatasetKind::Controversy, "polemica.json").await;
    let CanonicalDataset::Controversy(back) = reparse(&dataset) else {
        panic!("expected a controversy graph");
    };
    let ids: Vec<&str> = back.nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["m1", "m2", "m3", "missing"]);
    assert_eq!(back.edges.len(), 3);
}

#[tokio::test]
async fn handoff_carries_a_dataset_to_one_consumer() {
    let dataset = ingest(DatasetKind::Popularity, "popularidade.csv").await;
    let store = HandoffStore::new();
    let id = store.put(Handoff::seal(&dataset).unwrap());

    let received = store.take(id).unwrap().open().unwrap();
    assert_eq!(received, dataset);
    assert!(store.take(id).is_err());
}
