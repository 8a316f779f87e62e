use std::f64::consts::TAU;
use std::path::PathBuf;

use rand::rngs::StdRng;
use rand::SeedableRng;
use vsion::pipeline::processing::graph::NodeDetails;
use vsion::{color_from_id, Config, DatasetKind, GraphModelBuilder, Pipeline, Stance};

fn resource(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("resources")
        .join(name)
}

#[tokio::test]
async fn controversy_csv_graph_summary_and_defaults() {
    let pipeline = Pipeline::default();
    let ingested = pipeline
        .ingest_file(DatasetKind::Controversy, resource("polemica.csv"))
        .await
        .unwrap();
    let model = pipeline.build_graph(&ingested.dataset, Some(1));

    assert_eq!(model.summary.node_count, 4);
    assert_eq!(model.summary.edge_count, 4);
    let top = model.summary.most_connected.as_ref().unwrap();
    assert_eq!((top.id.as_str(), top.degree), ("m2", 3));

    // Blank relation and color on the second row
    assert_eq!(model.edges[1].relation, "neutralidade");
    assert_eq!(model.edges[1].color, "#999");
    assert_eq!(model.edges[0].id, "m1_m2");
    assert!(model.dangling_edges().is_empty());

    let ghost = model.node("ghost").unwrap();
    assert_eq!(ghost.label, "autor_3");
    assert!(ghost.pie.as_ref().unwrap().slices.iter().all(|s| s.sweep == 0.0));
}

#[tokio::test]
async fn controversy_json_reports_dangling_edges() {
    let pipeline = Pipeline::default();
    let ingested = pipeline
        .ingest_file(DatasetKind::Controversy, resource("polemica.json"))
        .await
        .unwrap();
    let model = pipeline.build_graph(&ingested.dataset, None);

    assert_eq!(model.edges.len(), 3);
    let dangling = model.dangling_edges();
    assert_eq!(dangling.len(), 1);
    assert_eq!(dangling[0].target, "missing");

    assert_eq!(model.summary.most_connected.as_ref().unwrap().id, "m1");
    assert_eq!(model.node("m3").unwrap().label, "autor_2");

    let m1 = model.node("m1").unwrap();
    let pie = m1.pie.as_ref().unwrap();
    let sweeps: Vec<f64> = pie.slices.iter().map(|s| s.sweep).collect();
    assert_eq!(sweeps, vec![0.75 * TAU, 0.0, 0.25 * TAU]);
    assert_eq!(m1.details, NodeDetails::Controversy { text: "Isso é ótimo".into(), total: 4.0 });
}

#[tokio::test]
async fn participation_graph_sizes_colors_and_positions() {
    let pipeline = Pipeline::default();
    let ingested = pipeline
        .ingest_file(DatasetKind::Participation, resource("participacao.csv"))
        .await
        .unwrap();
    let model = GraphModelBuilder::new(&Config::default())
        .build(&ingested.dataset, &mut StdRng::seed_from_u64(3));

    let ana = model.node("ana").unwrap();
    assert_eq!(ana.size, 85.0);
    assert_eq!(ana.color, color_from_id("ana"));
    assert!(!ana.position_synthesized);

    let bia = model.node("bia").unwrap();
    assert_eq!(bia.size, 40.0);
    assert!(bia.position_synthesized);
    let p = bia.position.unwrap();
    assert!(p.x.abs() <= 400.0 && p.y.abs() <= 400.0);

    assert_eq!(model.summary.total_interactions, Some(15));
    assert!(model.edges.is_empty());
}

#[tokio::test]
async fn popularity_graph_uses_its_own_sizing() {
    let pipeline = Pipeline::default();
    let ingested = pipeline
        .ingest_file(DatasetKind::Popularity, resource("popularidade.csv"))
        .await
        .unwrap();
    let model = pipeline.build_graph(&ingested.dataset, Some(9));

    assert_eq!(model.nodes[0].size, 62.0);
    assert_eq!(model.nodes[1].size, 200.0);

    let pie = model.nodes[0].pie.as_ref().unwrap();
    assert_eq!(pie.slices[0].stance, Stance::Support);
    assert_eq!(pie.slices[0].color, "#00FF66");
    let rendered: Vec<String> = pie
        .percentages()
        .into_iter()
        .map(|(_, p)| vsion::pipeline::processing::graph::format_percentage(p))
        .collect();
    assert_eq!(rendered, vec!["75.0%", "25.0%", "0.0%"]);
}

#[test]
fn same_seed_same_layout() {
    let dataset = vsion::normalize(
        DatasetKind::Participation,
        &vsion::parse_csv("author_id,texts\na,x\nb,y\nc,z\n"),
    )
    .dataset;
    let builder = GraphModelBuilder::new(&Config::default());
    assert_eq!(builder.build_seeded(&dataset, Some(42)), builder.build_seeded(&dataset, Some(42)));
}
