//! Version-aware, single-flight cache of analysis runs.
//!
//! One entry per document identity. An entry is served only while its version
//! equals the document's current version; any new run replaces the entry as a
//! whole, whether or not the previous run has settled.

use crate::diagnostic::Diagnostic;
use crate::error::AnalysisError;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::future::{BoxFuture, Shared};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Diagnostics recovered from one run, shared read-only by every consumer.
pub type DiagnosticSet = Arc<[Diagnostic]>;

/// Settled value of a run; the error is shared so every holder sees the same failure.
pub type AnalysisOutcome = std::result::Result<DiagnosticSet, Arc<AnalysisError>>;

/// A pending or settled analysis run. Clones observe the same outcome.
pub type Computation = Shared<BoxFuture<'static, AnalysisOutcome>>;

#[derive(Clone)]
pub struct CacheEntry {
    pub version: i32,
    pub computation: Computation,
}

impl CacheEntry {
    pub fn is_settled(&self) -> bool {
        self.computation.peek().is_some()
    }
}

impl fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("version", &self.version)
            .field("settled", &self.is_settled())
            .finish()
    }
}

/// Outcome of a cache lookup that may start a new run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lookup {
    Hit,
    Miss,
}

#[derive(Debug, Default)]
pub struct DiagnosticCache {
    entries: DashMap<PathBuf, CacheEntry>,
}

impl DiagnosticCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached computation for `key`, if it was started at `version`.
    pub fn get(&self, key: &Path, version: i32) -> Option<Computation> {
        self.entries
            .get(key)
            .filter(|entry| entry.version == version)
            .map(|entry| entry.computation.clone())
    }

    /// Version of the entry currently stored for `key`.
    pub fn version_of(&self, key: &Path) -> Option<i32> {
        self.entries.get(key).map(|entry| entry.version)
    }

    /// Unconditionally replaces the entry for `key`.
    pub fn insert(&self, key: PathBuf, version: i32, computation: Computation) {
        self.entries.insert(
            key,
            CacheEntry {
                version,
                computation,
            },
        );
    }

    /// Returns the cached computation for `(key, version)` or stores the one
    /// produced by `start`.
    ///
    /// Lookup and insertion happen under the same shard lock, so concurrent
    /// callers for one version never both call `start`.
    pub fn get_or_start<F>(&self, key: &Path, version: i32, start: F) -> (Computation, Lookup)
    where
        F: FnOnce() -> Computation,
    {
        match self.entries.entry(key.to_path_buf()) {
            Entry::Occupied(entry) if entry.get().version == version => {
                (entry.get().computation.clone(), Lookup::Hit)
            }
            Entry::Occupied(mut entry) => {
                let computation = start();
                entry.insert(CacheEntry {
                    version,
                    computation: computation.clone(),
                });
                (computation, Lookup::Miss)
            }
            Entry::Vacant(entry) => {
                let computation = start();
                entry.insert(CacheEntry {
                    version,
                    computation: computation.clone(),
                });
                (computation, Lookup::Miss)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
