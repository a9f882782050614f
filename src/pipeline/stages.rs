//! Stage helpers shared by every pipeline
//!
//! Each stage is one tokio task that owns the sending half of its output
//! channel. A stage exits when the token is cancelled, when its input closes
//! or when its consumer goes away; dropping the sender then closes the next
//! stage's input.

use crate::error::SinkError;
use crate::sink::BatchSink;
use crate::source::ArtifactSource;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// What a sink stage managed to persist before it stopped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PipelineSummary {
    pub batches: u64,
    pub items: u64,
}

/// Sleep for `period`; `false` if cancelled first.
pub(crate) async fn pause(period: Duration, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        _ = tokio::time::sleep(period) => true,
    }
}

/// Send unless cancelled; `false` when the stage should stop.
pub(crate) async fn forward<T>(tx: &mpsc::Sender<T>, item: T, cancel: &CancellationToken) -> bool {
    tokio::select! {
        _ = cancel.cancelled() => false,
        sent = tx.send(item) => sent.is_ok(),
    }
}

/// Poll `source` on the blocking pool and push every artifact downstream.
///
/// An empty poll or a transient error waits `poll_interval` before the next
/// attempt.
pub fn spawn_generator<T: Send + 'static>(
    source: Arc<dyn ArtifactSource<T>>,
    poll_interval: Duration,
    capacity: usize,
    cancel: CancellationToken,
) -> (mpsc::Receiver<T>, JoinHandle<()>) {
    let (tx, rx) = mpsc::channel(capacity);

    let handle = tokio::spawn(async move {
        log::info!("🚀 Generator started ({} source)", source.source_type());
        let mut emitted = 0u64;

        loop {
            let polling = Arc::clone(&source);
            let polled = tokio::select! {
                _ = cancel.cancelled() => break,
                res = tokio::task::spawn_blocking(move || polling.next()) => res,
            };

            match polled {
                Ok(Ok(Some(artifact))) => {
                    if !forward(&tx, artifact, &cancel).await {
                        break;
                    }
                    emitted += 1;
                }
                Ok(Ok(None)) => {
                    if !pause(poll_interval, &cancel).await {
                        break;
                    }
                }
                Ok(Err(e)) => {
                    log::warn!("⚠️  Source poll failed: {}", e);
                    if !pause(poll_interval, &cancel).await {
                        break;
                    }
                }
                Err(e) => {
                    log::error!("❌ Source poll task failed: {}", e);
                    break;
                }
            }
        }

        log::info!("🛑 Generator stopped after {} artifacts", emitted);
    });

    (rx, handle)
}

/// Apply a pure `transform` to every item; `None` drops the item.
pub fn spawn_transform<I, O, F>(
    name: &'static str,
    mut input: mpsc::Receiver<I>,
    capacity: usize,
    cancel: CancellationToken,
    mut transform: F,
) -> (mpsc::Receiver<O>, JoinHandle<()>)
where
    I: Send + 'static,
    O: Send + 'static,
    F: FnMut(I) -> Option<O> + Send + 'static,
{
    let (tx, rx) = mpsc::channel(capacity);

    let handle = tokio::spawn(async move {
        let (mut passed, mut dropped) = (0u64, 0u64);

        loop {
            let item = tokio::select! {
                _ = cancel.cancelled() => break,
                item = input.recv() => item,
            };
            let Some(item) = item else {
                break;
            };

            match transform(item) {
                Some(out) => {
                    if !forward(&tx, out, &cancel).await {
                        break;
                    }
                    passed += 1;
                }
                None => dropped += 1,
            }
        }

        log::info!("🛑 {} stage stopped ({} passed, {} dropped)", name, passed, dropped);
    });

    (rx, handle)
}

/// Save every incoming batch until cancelled or the input closes.
///
/// The first sink error ends the stage and is returned.
pub async fn drain_into_sink<T: Send + 'static>(
    mut input: mpsc::Receiver<Vec<T>>,
    sink: Arc<dyn BatchSink<T>>,
    cancel: CancellationToken,
) -> Result<PipelineSummary, SinkError> {
    log::info!("💾 Sink ready ({} backend)", sink.backend_type());
    let mut summary = PipelineSummary::default();

    loop {
        let batch = tokio::select! {
            _ = cancel.cancelled() => break,
            batch = input.recv() => batch,
        };
        let Some(batch) = batch else {
            break;
        };

        let size = batch.len() as u64;
        if let Err(e) = sink.save(batch).await {
            log::error!("❌ {} sink failed: {}", sink.backend_type(), e);
            return Err(e);
        }

        summary.batches += 1;
        summary.items += size;
        log::debug!("✅ Saved batch of {} ({} batches so far)", size, summary.batches);
    }

    log::info!(
        "🛑 Sink stopped ({} batches, {} items)",
        summary.batches,
        summary.items
    );
    Ok(summary)
}
