//! # cs2flow
//!
//! Match telemetry pipelines: raw per-match statistics are validated,
//! flattened into one row per round × acting player × opposing player, and
//! persisted in batches. A second pipeline reads the persisted rows back,
//! looks up each player's cumulative history and derives order-statistic
//! feature vectors.
//!
//! ```text
//! raw dir ─► SourceGenerator ─► validate ─► flatten ─► BatchSink (JSON files | SQLite)
//!
//! games ─► match ids ─► resolve ─┬─► extractor ─┐
//!                                ├─► extractor ─┼─► FeatureFileSink
//!                                └─► extractor ─┘
//! ```
//!
//! Every arrow is a bounded `tokio::sync::mpsc` channel and every stage
//! watches one shared `CancellationToken`.

pub mod config;
pub mod error;
pub mod features;
pub mod flatten;
pub mod model;
pub mod pipeline;
pub mod runtime;
pub mod sink;
pub mod source;
pub mod store;

pub use config::{ExpansionMode, PipelineConfig, SourceMode};
pub use error::{PipelineError, SinkError, SourceError, StoreError};
pub use model::{FeatureVector, FlatRow, RawMatch};
