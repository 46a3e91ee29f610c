//! Process-wide memo of opened documents.
//!
//! Each canonical path is parsed once; later operations on the same file
//! share the handle. Only a failure to open keeps a path out of the cache.

use std::collections::{HashMap, VecDeque};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::detect::resolve_pdf_path;
use crate::error::Result;
use crate::source::{DocumentSource, LopdfSource};

/// Shared handle to an opened document.
pub type SharedSource = Arc<dyn DocumentSource>;

/// Opens a document at a canonical path.
pub type Opener = Box<dyn Fn(&Path) -> Result<SharedSource> + Send + Sync>;

/// Decides how many cached documents to let go.
pub trait RetentionPolicy: Send + Sync + fmt::Debug {
    /// Number of oldest entries to drop when the cache holds `len` entries.
    fn excess(&self, len: usize) -> usize;
}

/// Never evict; documents live for the whole process.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeepForever;

impl RetentionPolicy for KeepForever {
    fn excess(&self, _len: usize) -> usize {
        0
    }
}

/// Keep at most this many documents, dropping the oldest insertions.
#[derive(Debug, Clone, Copy)]
pub struct MaxEntries(pub usize);

impl RetentionPolicy for MaxEntries {
    fn excess(&self, len: usize) -> usize {
        len.saturating_sub(self.0)
    }
}

#[derive(Default)]
struct Entries {
    map: HashMap<PathBuf, SharedSource>,
    /// Keys, oldest first
    order: VecDeque<PathBuf>,
}

/// Cache of opened documents keyed by canonical path.
pub struct DocumentCache {
    entries: RwLock<Entries>,
    policy: Box<dyn RetentionPolicy>,
    opener: Opener,
}

impl fmt::Debug for DocumentCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentCache")
            .field("len", &self.len())
            .field("policy", &self.policy)
            .finish()
    }
}

impl Default for DocumentCache {
    fn default() -> Self {
        Self::new()
    }
}

impl DocumentCache {
    /// Cache that opens PDFs with lopdf and never evicts.
    pub fn new() -> Self {
        Self::with_opener(Box::new(|path: &Path| -> Result<SharedSource> {
            let source: SharedSource = Arc::new(LopdfSource::open(path)?);
            Ok(source)
        }))
    }

    /// Cache with a custom document opener.
    pub fn with_opener(opener: Opener) -> Self {
        Self {
            entries: RwLock::new(Entries::default()),
            policy: Box::new(KeepForever),
            opener,
        }
    }

    /// Replace the retention policy.
    pub fn with_policy(mut self, policy: impl RetentionPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    /// Resolve `path` and return its document, opening it on first use.
    pub fn open<P: AsRef<Path>>(&self, path: P) -> Result<SharedSource> {
        let key = resolve_pdf_path(path)?;

        if let Some(source) = self.read().map.get(&key) {
            log::debug!("cache hit: {}", key.display());
            return Ok(Arc::clone(source));
        }

        log::debug!("cache miss: {}", key.display());
        // Parse outside the lock; a concurrent open of the same file keeps
        // whichever handle landed first.
        let opened = (self.opener)(&key)?;
        Ok(self.insert_resolved(key, opened))
    }

    /// Register an already-opened document under `path`.
    pub fn insert<P: AsRef<Path>>(&self, path: P, source: SharedSource) -> SharedSource {
        let path = path.as_ref();
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.insert_resolved(key, source)
    }

    fn insert_resolved(&self, key: PathBuf, source: SharedSource) -> SharedSource {
        let mut entries = self.write();
        if let Some(existing) = entries.map.get(&key) {
            return Arc::clone(existing);
        }

        entries.map.insert(key.clone(), Arc::clone(&source));
        entries.order.push_back(key);

        let excess = self.policy.excess(entries.map.len());
        for _ in 0..excess {
            if let Some(old) = entries.order.pop_front() {
                log::debug!("evicting {}", old.display());
                entries.map.remove(&old);
            }
        }

        source
    }

    /// Number of cached documents.
    pub fn len(&self) -> usize {
        self.read().map.len()
    }

    /// Check if no documents are cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Check if a path is cached (compared after canonicalization).
    pub fn contains<P: AsRef<Path>>(&self, path: P) -> bool {
        let path = path.as_ref();
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.read().map.contains_key(&key)
    }

    /// Drop a document; returns whether it was cached.
    pub fn evict<P: AsRef<Path>>(&self, path: P) -> bool {
        let path = path.as_ref();
        let key = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        let mut entries = self.write();
        entries.order.retain(|k| k != &key);
        entries.map.remove(&key).is_some()
    }

    /// Drop every document.
    pub fn clear(&self) {
        let mut entries = self.write();
        entries.map.clear();
        entries.order.clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Entries> {
        self.entries.write().unwrap_or_else(|e| e.into_inner())
    }
}
