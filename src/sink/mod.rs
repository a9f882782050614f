//! Batched sinks
//!
//! A sink receives whole batches and persists each one all-or-nothing.
//! Backends:
//! - `SqliteRowSink`: one transaction per batch into the `games` table
//! - `JsonRowFileSink`: one pretty JSON array per match id
//! - `FeatureFileSink`: one pretty JSON object per match id

pub mod json_sink;
pub mod sqlite_sink;

use crate::error::SinkError;
use async_trait::async_trait;

pub use json_sink::{FeatureFileSink, JsonRowFileSink};
pub use sqlite_sink::SqliteRowSink;

/// Backend trait for persisting batches
#[async_trait]
pub trait BatchSink<T: Send + 'static>: Send + Sync {
    /// Persist one batch. An empty batch is a no-op.
    async fn save(&self, batch: Vec<T>) -> Result<(), SinkError>;

    /// Get backend type for logging
    fn backend_type(&self) -> &'static str;
}
