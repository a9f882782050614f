//! Feature pipeline
//!
//! ```text
//! match ids ─► resolve ─► [shared queue] ─┬─► extract ─┐
//!                                         ├─► extract ─┼─► BatchSink<MatchFeatures>
//!                                         └─► extract ─┘
//! ```
//!
//! Every id in the store is attempted once per discovery pass. Store errors
//! are logged and the id is retried on the next pass.

use super::join_stages;
use super::stages::{drain_into_sink, forward, spawn_generator, PipelineSummary};
use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::features::{extract, resolve};
use crate::model::{MatchFeatures, MatchParams};
use crate::sink::BatchSink;
use crate::source::{ArtifactSource, MatchIdSource};
use crate::store::MatchStore;
use std::sync::Arc;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

fn spawn_resolver(
    store: Arc<dyn MatchStore>,
    mut ids: mpsc::Receiver<i64>,
    capacity: usize,
    cancel: CancellationToken,
) -> (mpsc::Receiver<MatchParams>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(capacity);

    let handle = tokio::spawn(async move {
        loop {
            let id = tokio::select! {
                _ = cancel.cancelled() => break,
                id = ids.recv() => id,
            };
            let Some(match_id) = id else {
                break;
            };

            let lookup = Arc::clone(&store);
            let resolved =
                tokio::task::spawn_blocking(move || resolve(lookup.as_ref(), match_id)).await;

            match resolved {
                Ok(Ok(Some(params))) => {
                    if !forward(&tx, params, &cancel).await {
                        break;
                    }
                }
                Ok(Ok(None)) => {}
                Ok(Err(e)) => log::warn!("⚠️  Failed to resolve match {}: {}", match_id, e),
                Err(e) => {
                    log::error!("❌ Resolver task failed: {}", e);
                    break;
                }
            }
        }

        log::info!("🛑 Resolver stopped");
    });

    (rx, handle)
}

fn spawn_extractor(
    worker: usize,
    store: Arc<dyn MatchStore>,
    queue: Arc<Mutex<mpsc::Receiver<MatchParams>>>,
    out: mpsc::Sender<Vec<MatchFeatures>>,
    cancel: CancellationToken,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut extracted = 0u64;

        loop {
            let next = {
                let mut queue = queue.lock().await;
                tokio::select! {
                    _ = cancel.cancelled() => None,
                    params = queue.recv() => params,
                }
            };
            let Some(params) = next else {
                break;
            };

            let match_id = params.match_id;
            let lookup = Arc::clone(&store);
            let features =
                tokio::task::spawn_blocking(move || extract(lookup.as_ref(), &params)).await;

            match features {
                Ok(Ok(features)) => {
                    log::debug!(
                        "📐 Worker {} extracted {} features for match {}",
                        worker,
                        features.features.len(),
                        match_id
                    );
                    if !forward(&out, vec![features], &cancel).await {
                        break;
                    }
                    extracted += 1;
                }
                Ok(Err(e)) => log::warn!("⚠️  Failed to extract match {}: {}", match_id, e),
                Err(e) => {
                    log::error!("❌ Extractor task failed: {}", e);
                    break;
                }
            }
        }

        log::debug!("🛑 Worker {} stopped after {} matches", worker, extracted);
    })
}

/// Derive and persist feature vectors for every match in `store` until
/// `cancel` fires or the sink fails.
pub async fn run_feature_pipeline(
    store: Arc<dyn MatchStore>,
    sink: Arc<dyn BatchSink<MatchFeatures>>,
    config: &PipelineConfig,
    cancel: CancellationToken,
) -> Result<PipelineSummary, PipelineError> {
    let run = cancel.child_token();
    let capacity = config.queue_capacity;

    log::info!("🚀 Starting feature pipeline");
    log::info!("   ├─ Store: {}", store.backend_type());
    log::info!("   ├─ Workers: {}", config.feature_workers);
    log::info!("   ├─ Poll interval: {:?}", config.feature_poll_interval);
    log::info!("   └─ Sink: {}", sink.backend_type());

    let ids: Arc<dyn ArtifactSource<i64>> = Arc::new(MatchIdSource::new(Arc::clone(&store)));
    let (id_rx, generator) =
        spawn_generator(ids, config.feature_poll_interval, capacity, run.clone());

    let (params_rx, resolver) = spawn_resolver(Arc::clone(&store), id_rx, capacity, run.clone());

    let queue = Arc::new(Mutex::new(params_rx));
    let (out_tx, out_rx) = mpsc::channel(capacity);

    let mut handles = vec![generator, resolver];
    for worker in 0..config.feature_workers {
        handles.push(spawn_extractor(
            worker,
            Arc::clone(&store),
            Arc::clone(&queue),
            out_tx.clone(),
            run.clone(),
        ));
    }
    // Output closes once the last worker exits
    drop(out_tx);

    let outcome = drain_into_sink(out_rx, sink, run.clone()).await;
    let joined = join_stages(&run, handles).await;

    let summary = outcome?;
    joined?;
    Ok(summary)
}
