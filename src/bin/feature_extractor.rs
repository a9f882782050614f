//! Feature Extractor
//!
//! Polls the `games` table for match ids and writes one feature document per
//! match to the features directory.
//!
//! Usage:
//!   cargo run --release --bin feature_extractor
//!
//! Environment variables:
//!   DATABASE_PATH            - SQLite database (default: ./data/cs2.db)
//!   FEATURES_DIRECTORY       - output documents (default: ./data/features)
//!   FEATURE_WORKERS          - extractor pool size (default: 20)
//!   FEATURE_POLL_INTERVAL_MS - id discovery interval (default: 10000)

use cs2flow::model::MatchFeatures;
use cs2flow::pipeline::run_feature_pipeline;
use cs2flow::runtime::{init_logging, spawn_ctrl_c};
use cs2flow::sink::{BatchSink, FeatureFileSink};
use cs2flow::source::LocalFileStore;
use cs2flow::store::{MatchStore, SqliteMatchStore};
use cs2flow::PipelineConfig;
use log::info;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging();

    let config = PipelineConfig::from_env();

    info!("🚀 Feature Extractor");
    info!("   ├─ Database: {}", config.db_path.display());
    info!("   └─ Features directory: {}", config.features_dir.display());

    let store: Arc<dyn MatchStore> =
        Arc::new(SqliteMatchStore::open(&config.db_path, &config.schema_dir)?);
    let sink: Arc<dyn BatchSink<MatchFeatures>> = Arc::new(FeatureFileSink::new(Arc::new(
        LocalFileStore::new(&config.features_dir),
    )));

    let shutdown = CancellationToken::new();
    spawn_ctrl_c(shutdown.clone());
    info!("🔄 Press CTRL+C to shutdown gracefully");

    let summary = run_feature_pipeline(store, sink, &config, shutdown).await?;

    info!("✅ Feature extractor stopped ({} matches written)", summary.batches);
    Ok(())
}
