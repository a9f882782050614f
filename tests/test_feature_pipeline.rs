//! End-to-end test of the feature pipeline over a SQLite store.

mod common;

use chrono::{DateTime, Utc};
use common::{raw_match, schema_dir, wait_until};
use cs2flow::error::StoreError;
use cs2flow::flatten::{flatten, validate};
use cs2flow::model::{CumulativeStats, FeatureVector, RawMatch};
use cs2flow::pipeline::run_feature_pipeline;
use cs2flow::sink::sqlite_sink::insert_rows;
use cs2flow::sink::FeatureFileSink;
use cs2flow::source::LocalFileStore;
use cs2flow::store::{open_database, MatchStore, SqliteMatchStore};
use cs2flow::{ExpansionMode, PipelineConfig};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tempfile::tempdir;
use tokio_util::sync::CancellationToken;

fn decode(value: serde_json::Value) -> RawMatch {
    let game: RawMatch = serde_json::from_value(value).unwrap();
    assert!(validate(&game));
    game
}

/// Matches 1 and 2 share all ten players; match 3 only has one acting team.
fn seed(db_path: &Path) -> SqliteMatchStore {
    let mut conn = open_database(db_path, &schema_dir()).unwrap();

    let mut rows = flatten(
        &decode(raw_match(1, "2024-06-01T12:00:00Z", 16)),
        ExpansionMode::Symmetric,
    );
    rows.extend(flatten(
        &decode(raw_match(2, "2024-06-02T12:00:00Z", 20)),
        ExpansionMode::Symmetric,
    ));
    rows.extend(flatten(
        &decode(raw_match(3, "2024-06-03T12:00:00Z", 16)),
        ExpansionMode::SingleDirection,
    ));

    let tx = conn.transaction().unwrap();
    insert_rows(&tx, &rows).unwrap();
    tx.commit().unwrap();

    SqliteMatchStore::new(conn)
}

fn read_features(path: &Path) -> BTreeMap<String, FeatureVector> {
    serde_json::from_slice(&std::fs::read(path).unwrap()).unwrap()
}

#[tokio::test]
async fn test_features_written_per_match() {
    let dir = tempdir().unwrap();
    let features_dir = dir.path().join("features");
    let store = Arc::new(seed(&dir.path().join("cs2.db")));
    let sink = Arc::new(FeatureFileSink::new(Arc::new(LocalFileStore::new(&features_dir))));

    let mut values = HashMap::new();
    values.insert("FEATURE_POLL_INTERVAL_MS".to_string(), "20".to_string());
    values.insert("FEATURE_WORKERS".to_string(), "3".to_string());
    let config = PipelineConfig::from_map(&values);

    let cancel = CancellationToken::new();
    let run = {
        let cancel = cancel.clone();
        tokio::spawn(async move { run_feature_pipeline(store, sink, &config, cancel).await })
    };

    let out = features_dir.clone();
    wait_until(Duration::from_secs(10), || {
        out.join("1.json").exists() && out.join("2.json").exists()
    })
    .await;
    cancel.cancel();

    let summary = tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("pipeline did not stop")
        .unwrap()
        .unwrap();
    // Ids are rediscovered every pass, so documents may be rewritten
    assert!(summary.batches >= 2);

    // Nobody has history before the first match
    assert_eq!(std::fs::read(features_dir.join("1.json")).unwrap(), b"{}");

    // Match 3 never resolves to two sides
    assert!(!features_dir.join("3.json").exists());

    let features = read_features(&features_dir.join("2.json"));
    assert_eq!(features.len(), 20);

    let kills = &features["kills_total"];
    assert_eq!(kills.first, [11.0, 12.0, 13.0, 14.0, 15.0]);
    assert_eq!(kills.second, [16.0, 17.0, 18.0, 19.0, 20.0]);
    assert_eq!(kills.first_mean, 13.0);
    assert_eq!(kills.second_mean, 18.0);
    assert_eq!(kills.diffs[0][0], -5.0);
    assert_eq!(kills.diffs[4][0], -1.0);

    let per_round = &features["kills_per_round"];
    assert!((per_round.first[0] - 11.0 / 16.0).abs() < 1e-9);

    let adr = &features["adr_per_game"];
    assert_eq!(adr.first, [75.5; 5]);
}

/// Delegates to a SQLite store but fails the first start-time lookup.
struct FlakyStore {
    inner: SqliteMatchStore,
    failed: AtomicBool,
}

impl MatchStore for FlakyStore {
    fn match_ids(&self) -> Result<Vec<i64>, StoreError> {
        self.inner.match_ids()
    }

    fn begin_at(&self, match_id: i64) -> Result<Option<DateTime<Utc>>, StoreError> {
        if !self.failed.swap(true, Ordering::SeqCst) {
            return Err(StoreError::Schema("database is locked".to_string()));
        }
        self.inner.begin_at(match_id)
    }

    fn team_ids(&self, match_id: i64) -> Result<Vec<i64>, StoreError> {
        self.inner.team_ids(match_id)
    }

    fn player_ids(&self, match_id: i64, team_id: i64) -> Result<Vec<i64>, StoreError> {
        self.inner.player_ids(match_id, team_id)
    }

    fn cumulative_before(
        &self,
        player_id: i64,
        before: DateTime<Utc>,
    ) -> Result<Option<CumulativeStats>, StoreError> {
        self.inner.cumulative_before(player_id, before)
    }

    fn backend_type(&self) -> &'static str {
        "flaky"
    }
}

#[tokio::test]
async fn test_transient_store_error_is_retried() {
    let dir = tempdir().unwrap();
    let features_dir = dir.path().join("features");

    let mut conn = open_database(&dir.path().join("cs2.db"), &schema_dir()).unwrap();
    let rows = flatten(
        &decode(raw_match(1, "2024-06-01T12:00:00Z", 16)),
        ExpansionMode::Symmetric,
    );
    let tx = conn.transaction().unwrap();
    insert_rows(&tx, &rows).unwrap();
    tx.commit().unwrap();

    let store = Arc::new(FlakyStore {
        inner: SqliteMatchStore::new(conn),
        failed: AtomicBool::new(false),
    });
    let sink = Arc::new(FeatureFileSink::new(Arc::new(LocalFileStore::new(&features_dir))));

    let mut values = HashMap::new();
    values.insert("FEATURE_POLL_INTERVAL_MS".to_string(), "20".to_string());
    values.insert("FEATURE_WORKERS".to_string(), "1".to_string());
    let config = PipelineConfig::from_map(&values);

    let cancel = CancellationToken::new();
    let run = {
        let cancel = cancel.clone();
        tokio::spawn(async move { run_feature_pipeline(store, sink, &config, cancel).await })
    };

    // The only match fails its first resolution and succeeds on a later pass
    let out = features_dir.clone();
    wait_until(Duration::from_secs(10), || out.join("1.json").exists()).await;
    cancel.cancel();

    tokio::time::timeout(Duration::from_secs(5), run)
        .await
        .expect("pipeline did not stop")
        .unwrap()
        .unwrap();
    assert_eq!(std::fs::read(features_dir.join("1.json")).unwrap(), b"{}");
}
