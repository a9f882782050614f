//! Artifact sources
//!
//! A source is polled by the generator stage one artifact at a time. All
//! variants keep their cursor state behind a single mutex and never hold it
//! across file or database I/O.

pub mod cycle;
pub mod ids;
pub mod seen;

use crate::error::SourceError;
use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

pub use cycle::DirectorySource;
pub use ids::MatchIdSource;
pub use seen::SeenSetSource;

/// Pull-based artifact producer.
///
/// `Ok(None)` means nothing is available right now; callers decide how long
/// to wait before polling again.
pub trait ArtifactSource<T>: Send + Sync {
    fn next(&self) -> Result<Option<T>, SourceError>;

    /// Short name for logging
    fn source_type(&self) -> &'static str;
}

/// Flat directory of named documents.
pub trait FileStore: Send + Sync {
    /// Visible file names (no subdirectories), sorted ascending.
    fn list(&self) -> io::Result<Vec<String>>;

    fn read(&self, name: &str) -> io::Result<Vec<u8>>;

    /// Create or overwrite `name`.
    fn write(&self, name: &str, contents: &[u8]) -> io::Result<()>;

    /// Create or overwrite several documents. The default writes them one by
    /// one, so a failure can leave earlier documents written.
    fn write_all(&self, documents: &[(String, Vec<u8>)]) -> io::Result<()> {
        for (name, contents) in documents {
            self.write(name, contents)?;
        }
        Ok(())
    }
}

/// `FileStore` over one directory on local disk.
#[derive(Debug, Clone)]
pub struct LocalFileStore {
    root: PathBuf,
}

impl LocalFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn staging_path(&self, name: &str) -> PathBuf {
        self.root.join(format!(".{}.tmp", name))
    }
}

impl FileStore for LocalFileStore {
    fn list(&self) -> io::Result<Vec<String>> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.root)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            // Hidden names include in-flight staging files from `write`
            if name.starts_with('.') {
                continue;
            }
            names.push(name);
        }
        names.sort();
        Ok(names)
    }

    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.root.join(name))
    }

    fn write(&self, name: &str, contents: &[u8]) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;

        // Write-then-rename so readers never observe a half-written document
        let staging = self.staging_path(name);
        fs::write(&staging, contents)?;
        fs::rename(&staging, self.root.join(name))
    }

    /// Stages every document before the first rename; nothing becomes
    /// visible if any staging write fails.
    fn write_all(&self, documents: &[(String, Vec<u8>)]) -> io::Result<()> {
        fs::create_dir_all(&self.root)?;

        let mut staged = Vec::with_capacity(documents.len());
        for (name, contents) in documents {
            let staging = self.staging_path(name);
            if let Err(e) = fs::write(&staging, contents) {
                for path in &staged {
                    let _ = fs::remove_file(path);
                }
                return Err(e);
            }
            staged.push(staging);
        }

        for ((name, _), staging) in documents.iter().zip(&staged) {
            fs::rename(staging, self.root.join(name))?;
        }
        Ok(())
    }
}

/// In-memory `FileStore`, used by tests and dry runs.
#[derive(Debug, Default)]
pub struct MemoryFileStore {
    files: Mutex<BTreeMap<String, Vec<u8>>>,
}

impl MemoryFileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, name: impl Into<String>, contents: impl Into<Vec<u8>>) -> io::Result<()> {
        let mut files = self.files.lock().map_err(|_| poisoned())?;
        files.insert(name.into(), contents.into());
        Ok(())
    }

    /// `true` if `name` was present.
    pub fn remove(&self, name: &str) -> io::Result<bool> {
        let mut files = self.files.lock().map_err(|_| poisoned())?;
        Ok(files.remove(name).is_some())
    }

    pub fn get(&self, name: &str) -> Option<Vec<u8>> {
        self.files.lock().ok()?.get(name).cloned()
    }

    pub fn len(&self) -> usize {
        self.files.lock().map(|f| f.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn poisoned() -> io::Error {
    io::Error::new(io::ErrorKind::Other, "file store lock poisoned")
}

impl FileStore for MemoryFileStore {
    fn list(&self) -> io::Result<Vec<String>> {
        let files = self.files.lock().map_err(|_| poisoned())?;
        Ok(files.keys().cloned().collect())
    }

    fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        let files = self.files.lock().map_err(|_| poisoned())?;
        files
            .get(name)
            .cloned()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, name.to_string()))
    }

    fn write(&self, name: &str, contents: &[u8]) -> io::Result<()> {
        let mut files = self.files.lock().map_err(|_| poisoned())?;
        files.insert(name.to_string(), contents.to_vec());
        Ok(())
    }

    fn write_all(&self, documents: &[(String, Vec<u8>)]) -> io::Result<()> {
        let mut files = self.files.lock().map_err(|_| poisoned())?;
        for (name, contents) in documents {
            files.insert(name.clone(), contents.clone());
        }
        Ok(())
    }
}
