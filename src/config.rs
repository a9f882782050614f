//! Pipeline configuration from a flat key/value surface
//!
//! Binaries feed this from the process environment (after `dotenv`), tests
//! feed it from a `HashMap`.

use std::collections::HashMap;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

/// Which team directions the flattener enumerates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExpansionMode {
    /// Both team orderings: 2 × 5 × 5 rows per round.
    #[default]
    Symmetric,
    /// Lower team id acting only: 5 × 5 rows per round.
    SingleDirection,
}

impl FromStr for ExpansionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "symmetric" | "both" => Ok(ExpansionMode::Symmetric),
            "single" | "single_direction" | "single-direction" => {
                Ok(ExpansionMode::SingleDirection)
            }
            other => Err(format!("unknown expansion mode '{}'", other)),
        }
    }
}

/// Which directory source variant feeds the raw pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMode {
    /// Rescan on exhaustion, never redeliver a filename.
    #[default]
    Seen,
    /// Replay the directory listing in order, wrapping around forever.
    Cycle,
}

impl FromStr for SourceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "seen" | "dedup" => Ok(SourceMode::Seen),
            "cycle" | "cycling" => Ok(SourceMode::Cycle),
            other => Err(format!("unknown source mode '{}'", other)),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Directory of raw match JSON documents
    pub raw_dir: PathBuf,

    /// Directory of flattened batch files (one per match)
    pub flatten_dir: PathBuf,

    /// Directory of feature documents (one per match)
    pub features_dir: PathBuf,

    /// SQLite database file
    pub db_path: PathBuf,

    /// Directory holding the `.sql` migrations
    pub schema_dir: PathBuf,

    /// Sleep between empty directory polls
    pub poll_interval: Duration,

    /// Sleep between match id discovery queries
    pub feature_poll_interval: Duration,

    /// Capacity of every inter-stage channel
    pub queue_capacity: usize,

    /// Size of the feature extractor worker pool
    pub feature_workers: usize,

    pub expansion: ExpansionMode,

    pub source_mode: SourceMode,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            raw_dir: PathBuf::from("./data/raw"),
            flatten_dir: PathBuf::from("./data/flatten"),
            features_dir: PathBuf::from("./data/features"),
            db_path: PathBuf::from("./data/cs2.db"),
            schema_dir: PathBuf::from("sql"),
            poll_interval: Duration::from_millis(1_000),
            feature_poll_interval: Duration::from_millis(10_000),
            queue_capacity: 100,
            feature_workers: 20,
            expansion: ExpansionMode::Symmetric,
            source_mode: SourceMode::Seen,
        }
    }
}

impl PipelineConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `RAW_DIRECTORY` (default: ./data/raw)
    /// - `FLATTEN_DIRECTORY` (default: ./data/flatten)
    /// - `FEATURES_DIRECTORY` (default: ./data/features)
    /// - `DATABASE_PATH` (default: ./data/cs2.db)
    /// - `SCHEMA_DIR` (default: sql)
    /// - `POLL_INTERVAL_MS` (default: 1000)
    /// - `FEATURE_POLL_INTERVAL_MS` (default: 10000)
    /// - `QUEUE_CAPACITY` (default: 100)
    /// - `FEATURE_WORKERS` (default: 20)
    /// - `EXPANSION_MODE` (default: symmetric)
    /// - `SOURCE_MODE` (default: seen)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_map(values: &HashMap<String, String>) -> Self {
        Self::from_lookup(|key| values.get(key).cloned())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let path = |key: &str, default: PathBuf| {
            lookup(key)
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(default)
        };

        Self {
            raw_dir: path("RAW_DIRECTORY", defaults.raw_dir),
            flatten_dir: path("FLATTEN_DIRECTORY", defaults.flatten_dir),
            features_dir: path("FEATURES_DIRECTORY", defaults.features_dir),
            db_path: path("DATABASE_PATH", defaults.db_path),
            schema_dir: path("SCHEMA_DIR", defaults.schema_dir),
            poll_interval: Duration::from_millis(parse_or(
                &lookup,
                "POLL_INTERVAL_MS",
                defaults.poll_interval.as_millis() as u64,
            )),
            feature_poll_interval: Duration::from_millis(parse_or(
                &lookup,
                "FEATURE_POLL_INTERVAL_MS",
                defaults.feature_poll_interval.as_millis() as u64,
            )),
            queue_capacity: parse_or(&lookup, "QUEUE_CAPACITY", defaults.queue_capacity).max(1),
            feature_workers: parse_or(&lookup, "FEATURE_WORKERS", defaults.feature_workers).max(1),
            expansion: parse_or(&lookup, "EXPANSION_MODE", defaults.expansion),
            source_mode: parse_or(&lookup, "SOURCE_MODE", defaults.source_mode),
        }
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => default,
        Some(raw) => match raw.trim().parse() {
            Ok(value) => value,
            Err(_) => {
                log::warn!("Invalid {} '{}', using default", key, raw);
                default
            }
        },
    }
}
