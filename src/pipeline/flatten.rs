//! Flatten pipelines
//!
//! ```text
//! RawMatch source ─► validate ─► flatten ─► BatchSink<FlatRow>
//! Vec<FlatRow> source ─────────────────────► BatchSink<FlatRow>
//! ```

use super::stages::{drain_into_sink, spawn_generator, spawn_transform, PipelineSummary};
use super::join_stages;
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::flatten::{flatten, validate};
use crate::model::{FlatRow, RawMatch};
use crate::sink::BatchSink;
use crate::source::ArtifactSource;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// Validate, flatten and persist raw matches until `cancel` fires or the
/// sink fails.
pub async fn run_flatten_pipeline(
    source: Arc<dyn ArtifactSource<RawMatch>>,
    sink: Arc<dyn BatchSink<FlatRow>>,
    config: &PipelineConfig,
    cancel: CancellationToken,
) -> Result<PipelineSummary, PipelineError> {
    let run = cancel.child_token();
    let capacity = config.queue_capacity;
    let mode = config.expansion;

    log::info!("🚀 Starting flatten pipeline");
    log::info!("   ├─ Expansion: {:?}", mode);
    log::info!("   ├─ Queue capacity: {}", capacity);
    log::info!("   └─ Sink: {}", sink.backend_type());

    let (raw_rx, generator) =
        spawn_generator(source, config.poll_interval, capacity, run.clone());

    let (valid_rx, validator) =
        spawn_transform("validate", raw_rx, capacity, run.clone(), |game: RawMatch| {
            if validate(&game) {
                Some(game)
            } else {
                log::debug!("Rejected match {}", game.id);
                None
            }
        });

    let (rows_rx, flattener) =
        spawn_transform("flatten", valid_rx, capacity, run.clone(), move |game: RawMatch| {
            Some(flatten(&game, mode))
        });

    let outcome = drain_into_sink(rows_rx, sink, run.clone()).await;
    let joined = join_stages(&run, vec![generator, validator, flattener]).await;

    let summary = outcome?;
    joined?;
    Ok(summary)
}

/// Load already-flattened batches into the sink unchanged.
pub async fn run_loader_pipeline(
    source: Arc<dyn ArtifactSource<Vec<FlatRow>>>,
    sink: Arc<dyn BatchSink<FlatRow>>,
    config: &PipelineConfig,
    cancel: CancellationToken,
) -> Result<PipelineSummary, PipelineError> {
    let run = cancel.child_token();

    log::info!("🚀 Starting loader pipeline");
    log::info!("   ├─ Queue capacity: {}", config.queue_capacity);
    log::info!("   └─ Sink: {}", sink.backend_type());

    let (batch_rx, generator) = spawn_generator(
        source,
        config.poll_interval,
        config.queue_capacity,
        run.clone(),
    );

    let outcome = drain_into_sink(batch_rx, sink, run.clone()).await;
    let joined = join_stages(&run, vec![generator]).await;

    let summary = outcome?;
    joined?;
    Ok(summary)
}
