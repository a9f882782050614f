//! Match id discovery over the analytical store
//!
//! Each pass lists every match id in the store (newest first) and hands them
//! all out again, so a match that failed downstream is retried and a match
//! whose players gained older history is recomputed. The feature sink
//! overwrites, so repeats are idempotent.

use super::ArtifactSource;
use crate::error::SourceError;
use crate::store::MatchStore;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct IdState {
    pending: VecDeque<i64>,
    /// Set once the current pass has handed out an id
    pass_open: bool,
}

pub struct MatchIdSource {
    store: Arc<dyn MatchStore>,
    state: Mutex<IdState>,
}

impl MatchIdSource {
    pub fn new(store: Arc<dyn MatchStore>) -> Self {
        Self {
            store,
            state: Mutex::new(IdState::default()),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, IdState>, SourceError> {
        self.state.lock().map_err(|_| SourceError::Poisoned)
    }
}

impl ArtifactSource<i64> for MatchIdSource {
    /// `Ok(None)` marks the end of a pass; the next call starts a new one.
    fn next(&self) -> Result<Option<i64>, SourceError> {
        {
            let mut state = self.lock()?;
            if let Some(id) = state.pending.pop_front() {
                return Ok(Some(id));
            }
            if state.pass_open {
                state.pass_open = false;
                return Ok(None);
            }
        }

        let ids = self.store.match_ids()?;
        log::debug!("🔍 Queued {} match ids", ids.len());

        let mut state = self.lock()?;
        state.pending = ids.into();
        let next = state.pending.pop_front();
        state.pass_open = next.is_some();
        Ok(next)
    }

    fn source_type(&self) -> &'static str {
        "match-ids"
    }
}
