//! Memoization of parsed definitions.

use std::sync::Arc;

use dashmap::DashMap;

use crate::fixtures::Definition;
use crate::observability::metrics;
use crate::routing::VariantKey;

/// A thread-safe cache of parsed definitions.
///
/// Fixture files are assumed static for the life of the process, so entries
/// are never evicted. Concurrent first insertions of the same key simply
/// overwrite each other with equal values.
#[derive(Debug, Clone, Default)]
pub struct EndpointCache {
    inner: Arc<DashMap<VariantKey, Arc<Definition>>>,
}

impl EndpointCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &VariantKey) -> Option<Arc<Definition>> {
        let hit = self.inner.get(key).map(|r| Arc::clone(r.value()));
        metrics::record_cache_lookup(hit.is_some());
        hit
    }

    pub fn put(&self, key: VariantKey, definition: Arc<Definition>) {
        self.inner.insert(key, definition);
    }

    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}
