//! Composite cache
//!
//! Maps a `StructuralKey` to the constructor of its generated implementation.
//!
//! ## Single-flight
//!
//! Each key owns a `OnceCell`. The DashMap shard lock is held only long enough
//! to fetch or insert that cell; the factory then runs inside
//! `OnceCell::get_or_try_init`, which lets exactly one thread initialize the
//! cell while other threads racing on the *same* key block until it is done.
//! Different keys never wait on each other's builds.
//!
//! Entries are never evicted. A factory that fails leaves its cell empty, and
//! the next request (or a thread already waiting on that cell) retries the
//! build in the same cell.

use std::sync::Arc;

use dashmap::DashMap;
use once_cell::sync::OnceCell;
use tracing::{debug, trace};
use weave_core::Result;

use crate::composite::Constructor;
use crate::key::StructuralKey;

/// Process-lifetime cache of generated constructors
#[derive(Debug, Default)]
pub struct CompositeCache {
    entries: DashMap<StructuralKey, Arc<OnceCell<Constructor>>>,
}

impl CompositeCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Cached constructor for `key`, building it with `factory` on a miss
    ///
    /// `factory` runs at most once per key across all threads, unless it fails.
    ///
    /// # Errors
    ///
    /// Propagates the factory's error; the cell stays empty so a later call retries.
    pub fn get_or_create<F>(&self, key: &StructuralKey, factory: F) -> Result<Constructor>
    where
        F: FnOnce() -> Result<Constructor>,
    {
        if let Some(ctor) = self.entries.get(key).and_then(|cell| cell.value().get().cloned()) {
            trace!(key = %key, "Composite cache hit");
            return Ok(ctor);
        }

        let cell = Arc::clone(
            self.entries
                .entry(key.clone())
                .or_insert_with(|| Arc::new(OnceCell::new()))
                .value(),
        );

        let mut built = false;
        let result = cell
            .get_or_try_init(|| {
                built = true;
                factory()
            })
            .cloned();

        match &result {
            Ok(_) if built => debug!(key = %key, "Composite cache miss, implementation built"),
            Ok(_) => trace!(key = %key, "Composite cache hit after waiting"),
            Err(e) => debug!(key = %key, error = %e, "Composite build failed, cell left empty"),
        }
        result
    }

    /// Whether a constructor is cached for `key`
    pub fn contains(&self, key: &StructuralKey) -> bool {
        self.entries
            .get(key)
            .map(|cell| cell.value().get().is_some())
            .unwrap_or(false)
    }

    /// Number of built entries
    pub fn len(&self) -> usize {
        self.entries
            .iter()
            .filter(|entry| entry.value().get().is_some())
            .count()
    }

    /// True if nothing has been built
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
