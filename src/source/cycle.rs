//! Cycling directory source
//!
//! Replays every decodable document in name order, then rescans and starts
//! over. Useful for soak runs against a fixed corpus; the sink is idempotent
//! so replays only overwrite. A pass that delivered anything ends with one
//! `Ok(None)`, so the generator waits a poll interval between passes.

use super::{ArtifactSource, FileStore};
use crate::error::SourceError;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct CycleState {
    files: Vec<String>,
    cursor: usize,
    /// Names that failed to decode; never read again
    rejected: HashSet<String>,
    /// Set once the current pass has delivered an artifact
    pass_open: bool,
}

pub struct DirectorySource<T> {
    store: Arc<dyn FileStore>,
    state: Mutex<CycleState>,
    _artifact: PhantomData<fn() -> T>,
}

impl<T> DirectorySource<T> {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self {
            store,
            state: Mutex::new(CycleState::default()),
            _artifact: PhantomData,
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, CycleState>, SourceError> {
        self.state.lock().map_err(|_| SourceError::Poisoned)
    }

    /// Next candidate name, rescanning once if the window is exhausted.
    /// `None` at the end of a pass that delivered something.
    fn next_name(&self) -> Result<Option<String>, SourceError> {
        let mut rescanned = false;
        loop {
            {
                let mut state = self.lock()?;
                while state.cursor < state.files.len() {
                    let name = state.files[state.cursor].clone();
                    state.cursor += 1;
                    if !state.rejected.contains(&name) {
                        return Ok(Some(name));
                    }
                }
                if state.pass_open {
                    state.pass_open = false;
                    return Ok(None);
                }
            }

            if rescanned {
                return Ok(None);
            }

            let files = self.store.list()?;
            let mut state = self.lock()?;
            state.files = files;
            state.cursor = 0;
            rescanned = true;
        }
    }
}

impl<T: DeserializeOwned> ArtifactSource<T> for DirectorySource<T> {
    fn next(&self) -> Result<Option<T>, SourceError> {
        // Every failed decode rejects a distinct name, so this terminates
        while let Some(name) = self.next_name()? {
            let content = self.store.read(&name)?;
            match serde_json::from_slice::<T>(&content) {
                Ok(artifact) => {
                    log::debug!("📥 Loaded {}", name);
                    self.lock()?.pass_open = true;
                    return Ok(Some(artifact));
                }
                Err(e) => {
                    log::warn!("⚠️  Skipping undecodable file {}: {}", name, e);
                    self.lock()?.rejected.insert(name);
                }
            }
        }

        Ok(None)
    }

    fn source_type(&self) -> &'static str {
        "cycle"
    }
}
