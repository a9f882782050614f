//! Match Flattener
//!
//! Watches the raw directory, validates and flattens every new match and
//! writes one `<match_id>.json` row file per match to the flatten directory.
//!
//! Usage:
//!   cargo run --release --bin match_flattener
//!
//! Environment variables:
//!   RAW_DIRECTORY     - raw match documents (default: ./data/raw)
//!   FLATTEN_DIRECTORY - output row files (default: ./data/flatten)
//!   EXPANSION_MODE    - symmetric | single (default: symmetric)
//!   POLL_INTERVAL_MS  - idle poll interval (default: 1000)

use cs2flow::model::RawMatch;
use cs2flow::pipeline::run_flatten_pipeline;
use cs2flow::runtime::{init_logging, spawn_ctrl_c};
use cs2flow::sink::{BatchSink, JsonRowFileSink};
use cs2flow::source::{LocalFileStore, SeenSetSource};
use cs2flow::{FlatRow, PipelineConfig};
use log::info;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = PipelineConfig::from_env();

    info!("🚀 Match Flattener");
    info!("   ├─ Raw directory: {}", config.raw_dir.display());
    info!("   └─ Flatten directory: {}", config.flatten_dir.display());

    let input = Arc::new(LocalFileStore::new(&config.raw_dir));
    let source = Arc::new(SeenSetSource::<RawMatch>::new(input));
    let sink: Arc<dyn BatchSink<FlatRow>> = Arc::new(JsonRowFileSink::new(Arc::new(
        LocalFileStore::new(&config.flatten_dir),
    )));

    let shutdown = CancellationToken::new();
    spawn_ctrl_c(shutdown.clone());
    info!("🔄 Press CTRL+C to shutdown gracefully");

    let summary = run_flatten_pipeline(source, sink, &config, shutdown).await?;

    info!("✅ Match flattener stopped ({} matches written)", summary.batches);
    Ok(())
}
