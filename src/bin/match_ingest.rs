//! Match Ingest
//!
//! Raw directory straight into SQLite: validate, flatten and load in one
//! process. `SOURCE_MODE=cycle` replays the directory forever, which is
//! handy for soak runs since the load is idempotent.
//!
//! Usage:
//!   cargo run --release --bin match_ingest
//!
//! Environment variables:
//!   RAW_DIRECTORY  - raw match documents (default: ./data/raw)
//!   DATABASE_PATH  - SQLite database (default: ./data/cs2.db)
//!   SOURCE_MODE    - seen | cycle (default: seen)
//!   EXPANSION_MODE - symmetric | single (default: symmetric)

use cs2flow::model::RawMatch;
use cs2flow::pipeline::run_flatten_pipeline;
use cs2flow::runtime::{init_logging, spawn_ctrl_c};
use cs2flow::sink::{BatchSink, SqliteRowSink};
use cs2flow::source::{ArtifactSource, DirectorySource, FileStore, LocalFileStore, SeenSetSource};
use cs2flow::{FlatRow, PipelineConfig, SourceMode};
use log::info;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = PipelineConfig::from_env();

    info!("🚀 Match Ingest");
    info!("   ├─ Raw directory: {}", config.raw_dir.display());
    info!("   ├─ Database: {}", config.db_path.display());
    info!("   └─ Source mode: {:?}", config.source_mode);

    let raw: Arc<dyn FileStore> = Arc::new(LocalFileStore::new(&config.raw_dir));
    let source: Arc<dyn ArtifactSource<RawMatch>> = match config.source_mode {
        SourceMode::Seen => Arc::new(SeenSetSource::<RawMatch>::new(raw)),
        SourceMode::Cycle => Arc::new(DirectorySource::<RawMatch>::new(raw)),
    };
    let sink: Arc<dyn BatchSink<FlatRow>> =
        Arc::new(SqliteRowSink::open(&config.db_path, &config.schema_dir)?);

    let shutdown = CancellationToken::new();
    spawn_ctrl_c(shutdown.clone());
    info!("🔄 Press CTRL+C to shutdown gracefully");

    let summary = run_flatten_pipeline(source, sink, &config, shutdown).await?;

    info!(
        "✅ Match ingest stopped ({} matches, {} rows)",
        summary.batches, summary.items
    );
    Ok(())
}
