use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{debug, info};

use vsion::{metrics, to_csv, Config, DatasetKind, Handoff, Pipeline};

#[derive(Parser)]
#[command(name = "vsion")]
#[command(about = "Normalize participation, controversy and popularity datasets into graph models")]
#[command(version = "0.1.0")]
struct Cli {
    /// Configuration file (falls back to $VSION_CONFIG, then vsion.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Print a Prometheus snapshot of the run's metrics to stderr
    #[arg(long, global = true)]
    metrics: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse, validate and normalize a file; prints the canonical dataset as JSON
    Ingest {
        /// Input file (.csv or .json)
        file: PathBuf,
        /// Dataset kind: participation, controversy or popularity
        #[arg(long)]
        kind: DatasetKind,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Ingest a file and print its graph model as JSON
    Graph {
        /// Input file (.csv or .json)
        file: PathBuf,
        /// Dataset kind: participation, controversy or popularity
        #[arg(long)]
        kind: DatasetKind,
        /// Seed for synthesized node positions
        #[arg(long)]
        seed: Option<u64>,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Write a canonical dataset (as printed by `ingest`) back out as CSV
    Export {
        /// Canonical dataset JSON
        file: PathBuf,
        /// Write to this file instead of stdout
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config
        .clone()
        .or_else(|| std::env::var("VSION_CONFIG").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("vsion.toml"))
}

fn write_output(out: Option<&Path>, content: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            fs::write(path, content)
                .with_context(|| format!("Failed to write output to {}", path.display()))?;
            info!("wrote {} bytes to {}", content.len(), path.display());
        }
        None => println!("{}", content),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let path = config_path(&cli);
    let config = Config::load_or_default(&path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;

    // Keep the guard alive so buffered log lines are flushed on exit
    let _guard = vsion::logging::init_logging(&config.logging);
    debug!("configuration loaded from {}", path.display());

    if cli.metrics {
        metrics::init_metrics();
    }

    let pipeline = Pipeline::new(config);

    match &cli.command {
        Commands::Ingest { file, kind, out } => {
            let ingested = pipeline
                .ingest_file(*kind, file)
                .await
                .with_context(|| format!("Failed to ingest {}", file.display()))?;
            let payload = Handoff::seal(&ingested.dataset)?.into_payload();
            write_output(out.as_deref(), &payload)?;
            eprintln!(
                "{} {} records from {} rows ({} warnings)",
                ingested.report.kind,
                ingested.report.records,
                ingested.report.rows,
                ingested.report.warnings.len()
            );
        }
        Commands::Graph {
            file,
            kind,
            seed,
            out,
        } => {
            let ingested = pipeline
                .ingest_file(*kind, file)
                .await
                .with_context(|| format!("Failed to ingest {}", file.display()))?;
            let model = pipeline.build_graph(&ingested.dataset, *seed);
            let json = serde_json::to_string_pretty(&model).context("Failed to serialize graph model")?;
            write_output(out.as_deref(), &json)?;
            eprintln!(
                "{} nodes, {} edges ({} dangling)",
                model.summary.node_count,
                model.summary.edge_count,
                model.dangling_edges().len()
            );
        }
        Commands::Export { file, out } => {
            let payload = fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            let dataset = Handoff::from_payload(payload)
                .and_then(Handoff::open)
                .with_context(|| format!("{} is not a canonical dataset", file.display()))?;
            write_output(out.as_deref(), &to_csv(&dataset))?;
        }
    }

    if let Some(snapshot) = metrics::render() {
        eprintln!("{}", snapshot);
    }

    Ok(())
}
