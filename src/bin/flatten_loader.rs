//! Flatten Loader
//!
//! Loads row files produced by `match_flattener` into the SQLite `games`
//! table, one transaction per file.
//!
//! Usage:
//!   cargo run --release --bin flatten_loader
//!
//! Environment variables:
//!   FLATTEN_DIRECTORY - row files to load (default: ./data/flatten)
//!   DATABASE_PATH     - SQLite database (default: ./data/cs2.db)
//!   SCHEMA_DIR        - schema migrations (default: sql)

use cs2flow::pipeline::run_loader_pipeline;
use cs2flow::runtime::{init_logging, spawn_ctrl_c};
use cs2flow::sink::{BatchSink, SqliteRowSink};
use cs2flow::source::{LocalFileStore, SeenSetSource};
use cs2flow::{FlatRow, PipelineConfig};
use log::info;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = PipelineConfig::from_env();

    info!("🚀 Flatten Loader");
    info!("   ├─ Flatten directory: {}", config.flatten_dir.display());
    info!("   └─ Database: {}", config.db_path.display());

    let input = Arc::new(LocalFileStore::new(&config.flatten_dir));
    let source = Arc::new(SeenSetSource::<Vec<FlatRow>>::new(input));
    let sink: Arc<dyn BatchSink<FlatRow>> =
        Arc::new(SqliteRowSink::open(&config.db_path, &config.schema_dir)?);

    let shutdown = CancellationToken::new();
    spawn_ctrl_c(shutdown.clone());
    info!("🔄 Press CTRL+C to shutdown gracefully");

    let summary = run_loader_pipeline(source, sink, &config, shutdown).await?;

    info!(
        "✅ Flatten loader stopped ({} files, {} rows)",
        summary.batches, summary.items
    );
    Ok(())
}
