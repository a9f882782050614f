//! Seen-set directory source
//!
//! Delivers each document at most once per process lifetime. The window of
//! unseen names is refreshed whenever the cursor runs off its end, so files
//! dropped into the directory while the pipeline runs are picked up on the
//! next rescan.

use super::{ArtifactSource, FileStore};
use crate::error::SourceError;
use serde::de::DeserializeOwned;
use std::collections::HashSet;
use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Default)]
struct SeenState {
    files: Vec<String>,
    cursor: usize,
    seen: HashSet<String>,
}

pub struct SeenSetSource<T> {
    store: Arc<dyn FileStore>,
    state: Mutex<SeenState>,
    _artifact: PhantomData<fn() -> T>,
}

impl<T> SeenSetSource<T> {
    pub fn new(store: Arc<dyn FileStore>) -> Self {
        Self {
            store,
            state: Mutex::new(SeenState::default()),
            _artifact: PhantomData,
        }
    }

    /// Number of names delivered or rejected so far.
    pub fn seen_count(&self) -> usize {
        self.state.lock().map(|s| s.seen.len()).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, SeenState>, SourceError> {
        self.state.lock().map_err(|_| SourceError::Poisoned)
    }

    fn next_name(&self) -> Result<Option<String>, SourceError> {
        let mut rescanned = false;
        loop {
            {
                let mut state = self.lock()?;
                while state.cursor < state.files.len() {
                    let name = state.files[state.cursor].clone();
                    state.cursor += 1;
                    if !state.seen.contains(&name) {
                        return Ok(Some(name));
                    }
                }
            }

            if rescanned {
                return Ok(None);
            }

            let listed = self.store.list()?;
            let mut state = self.lock()?;
            let unseen: Vec<String> = listed
                .into_iter()
                .filter(|name| !state.seen.contains(name))
                .collect();
            state.files = unseen;
            state.cursor = 0;
            rescanned = true;
        }
    }
}

impl<T: DeserializeOwned> ArtifactSource<T> for SeenSetSource<T> {
    fn next(&self) -> Result<Option<T>, SourceError> {
        while let Some(name) = self.next_name()? {
            // Read failures are not marked seen; the name comes back on rescan
            let content = self.store.read(&name)?;
            let decoded = serde_json::from_slice::<T>(&content);

            self.lock()?.seen.insert(name.clone());

            match decoded {
                Ok(artifact) => {
                    log::debug!("📥 Loaded {}", name);
                    return Ok(Some(artifact));
                }
                Err(e) => log::warn!("⚠️  Skipping undecodable file {}: {}", name, e),
            }
        }

        Ok(None)
    }

    fn source_type(&self) -> &'static str {
        "seen"
    }
}
