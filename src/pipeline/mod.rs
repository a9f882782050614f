//! Pipelines: typed bounded queues between explicit stage tasks.
//!
//! A run derives a child token from the caller's token. When the sink stage
//! returns (cancelled, input closed, or failed) the child token is cancelled
//! and every stage is joined before the run returns.

pub mod features;
pub mod flatten;
pub mod stages;

use crate::error::PipelineError;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub use features::run_feature_pipeline;
pub use flatten::{run_flatten_pipeline, run_loader_pipeline};
pub use stages::PipelineSummary;

/// Stop the remaining stages and wait for all of them.
async fn join_stages(run: &CancellationToken, handles: Vec<JoinHandle<()>>) -> Result<(), PipelineError> {
    run.cancel();

    let mut first_failure = None;
    for handle in handles {
        if let Err(e) = handle.await {
            log::error!("❌ Stage task failed: {}", e);
            first_failure.get_or_insert(e);
        }
    }

    match first_failure {
        Some(e) => Err(PipelineError::Join(e)),
        None => Ok(()),
    }
}
