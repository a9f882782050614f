//! File sinks: one pretty-printed JSON document per match id, overwritten
//! on every save.

use super::BatchSink;
use crate::error::SinkError;
use crate::model::{FlatRow, MatchFeatures};
use crate::source::FileStore;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;

fn document_name(match_id: i64) -> String {
    format!("{}.json", match_id)
}

async fn write_documents(
    store: &Arc<dyn FileStore>,
    documents: Vec<(String, Vec<u8>)>,
) -> Result<(), SinkError> {
    let store = Arc::clone(store);
    tokio::task::spawn_blocking(move || -> Result<(), SinkError> {
        store.write_all(&documents)?;
        Ok(())
    })
    .await
    .map_err(|e| SinkError::Io(std::io::Error::new(std::io::ErrorKind::Other, e)))?
}

/// Writes flattened rows as `<match_id>.json` arrays.
pub struct JsonRowFileSink {
    store: Arc<dyn FileStore>,
}

impl JsonRowFileSink {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BatchSink<FlatRow> for JsonRowFileSink {
    async fn save(&self, batch: Vec<FlatRow>) -> Result<(), SinkError> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut by_match: BTreeMap<i64, Vec<FlatRow>> = BTreeMap::new();
        for row in batch {
            by_match.entry(row.game_id).or_default().push(row);
        }

        let mut documents = Vec::with_capacity(by_match.len());
        for (match_id, rows) in &by_match {
            documents.push((document_name(*match_id), serde_json::to_vec_pretty(rows)?));
            log::debug!("💾 Writing {} rows for match {}", rows.len(), match_id);
        }

        write_documents(&self.store, documents).await
    }

    fn backend_type(&self) -> &'static str {
        "JSON rows"
    }
}

/// Writes feature mappings as `<match_id>.json` objects keyed by statistic.
pub struct FeatureFileSink {
    store: Arc<dyn FileStore>,
}

impl FeatureFileSink {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
impl BatchSink<MatchFeatures> for FeatureFileSink {
    async fn save(&self, batch: Vec<MatchFeatures>) -> Result<(), SinkError> {
        if batch.is_empty() {
            return Ok(());
        }

        let mut documents = Vec::with_capacity(batch.len());
        for features in &batch {
            // BTreeMap keeps keys sorted, so identical inputs give identical bytes
            documents.push((
                document_name(features.match_id),
                serde_json::to_vec_pretty(&features.features)?,
            ));
        }

        write_documents(&self.store, documents).await
    }

    fn backend_type(&self) -> &'static str {
        "JSON features"
    }
}
