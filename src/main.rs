mod app;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use entity_graph_layout::{LayoutConfig, LayoutEngine, LoadOutcome, load_config};
use serde_json::Value;
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// JSON payload with `nodes`/`links` or `entities`/`relationships`.
    payload: PathBuf,
    /// TOML file overriding physics constants and node styles.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Lay the graph out without a window and print the final snapshot as JSON.
    #[arg(long)]
    headless: bool,
    #[arg(long, default_value_t = 1000)]
    max_ticks: usize,
}

pub(crate) fn read_payload(path: &Path) -> Result<Value> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read payload {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("payload {} is not valid JSON", path.display()))
}

fn run_headless(args: &Args, config: LayoutConfig) -> Result<()> {
    let payload = read_payload(&args.payload)?;
    let mut engine = LayoutEngine::new(config);

    match engine.load(&payload).context("failed to normalize payload")? {
        LoadOutcome::Loaded { nodes, edges, .. } => {
            let ticks = engine.run_to_convergence(args.max_ticks);
            info!(nodes, edges, ticks, converged = engine.is_converged(), "headless layout finished");
        }
        LoadOutcome::Empty => warn!("payload has no entities or relationships"),
    }

    let snapshot = engine.snapshot();
    let json = serde_json::to_string_pretty(&snapshot).context("failed to encode snapshot")?;
    println!("{json}");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("entity_graph_layout=info".parse()?),
        )
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => load_config(path)?,
        None => LayoutConfig::default(),
    };

    if args.headless {
        return run_headless(&args, config);
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1280.0, 840.0]),
        ..Default::default()
    };

    let payload_path = args.payload;
    eframe::run_native(
        "entity graph",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::GraphViewerApp::new(
                cc,
                payload_path,
                config,
            )))
        }),
    )
    .map_err(|error| anyhow::anyhow!("viewer failed: {error}"))
}
