//! Memoizing facade over the pure builders
//!
//! Hosts re-run the builders on every re-render. `Engine` keys each result on
//! a fingerprint of (catalog, request, config) and serves repeats from an LRU
//! cache. A hit is only served when the stored catalog and request equal the
//! current ones, so a fingerprint collision costs a rebuild, never a wrong
//! result. Capacity 0 turns caching off.

use crate::catalog::Catalog;
use crate::config::EngineConfig;
use crate::error::EngineResult;
use crate::graph::{build_graph, GraphBuild, GraphRequest};
use crate::pivot::{build_matrix, PivotMatrix, PivotRequest};
use crate::stats::{summarize, Summary, SummaryRequest};
use lru::LruCache;
use rustc_hash::FxHasher;
use std::hash::{Hash, Hasher};
use std::num::NonZeroUsize;
use tracing::debug;

/// Cached result together with the inputs it was built from
struct Entry<R, V> {
    catalog: Catalog,
    request: R,
    value: V,
}

struct Memo<R, V> {
    cache: Option<LruCache<u64, Entry<R, V>>>,
    hits: u64,
}

impl<R: Clone + PartialEq, V: Clone> Memo<R, V> {
    fn new(capacity: usize) -> Self {
        Memo {
            cache: NonZeroUsize::new(capacity).map(LruCache::new),
            hits: 0,
        }
    }

    /// Serve `key` only when the stored inputs equal the current ones
    fn get_or_try<E>(
        &mut self,
        key: u64,
        catalog: &Catalog,
        request: &R,
        compute: impl FnOnce() -> Result<V, E>,
    ) -> Result<V, E> {
        if let Some(cache) = self.cache.as_mut() {
            if let Some(entry) = cache.get(&key) {
                if entry.request == *request && entry.catalog == *catalog {
                    self.hits += 1;
                    return Ok(entry.value.clone());
                }
                debug!("Fingerprint {:016x} collided; rebuilding", key);
            }
        }
        let value = compute()?;
        if let Some(cache) = self.cache.as_mut() {
            cache.put(
                key,
                Entry {
                    catalog: catalog.clone(),
                    request: request.clone(),
                    value: value.clone(),
                },
            );
        }
        Ok(value)
    }

    fn clear(&mut self) {
        if let Some(cache) = self.cache.as_mut() {
            cache.clear();
        }
    }
}

pub struct Engine {
    config: EngineConfig,
    graphs: Memo<GraphRequest, GraphBuild>,
    matrices: Memo<PivotRequest, PivotMatrix>,
    summaries: Memo<SummaryRequest, Summary>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        let capacity = config.cache_capacity;
        Engine {
            config,
            graphs: Memo::new(capacity),
            matrices: Memo::new(capacity),
            summaries: Memo::new(capacity),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn build_graph(&mut self, request: &GraphRequest, catalog: &Catalog) -> EngineResult<GraphBuild> {
        let key = self.key(catalog, request);
        let config = &self.config;
        self.graphs
            .get_or_try(key, catalog, request, || build_graph(request, catalog, config))
    }

    pub fn build_matrix(&mut self, request: &PivotRequest, catalog: &Catalog) -> PivotMatrix {
        let key = self.key(catalog, request);
        let config = &self.config;
        match self
            .matrices
            .get_or_try::<std::convert::Infallible>(key, catalog, request, || {
                Ok(build_matrix(request, catalog, config))
            })
        {
            Ok(matrix) => matrix,
            Err(never) => match never {},
        }
    }

    pub fn summarize(&mut self, request: &SummaryRequest, catalog: &Catalog) -> Summary {
        let key = self.key(catalog, request);
        match self
            .summaries
            .get_or_try::<std::convert::Infallible>(key, catalog, request, || Ok(summarize(request, catalog)))
        {
            Ok(summary) => summary,
            Err(never) => match never {},
        }
    }

    /// Results served from cache since creation
    pub fn cache_hits(&self) -> u64 {
        self.graphs.hits + self.matrices.hits + self.summaries.hits
    }

    pub fn clear_cache(&mut self) {
        debug!("Clearing engine caches");
        self.graphs.clear();
        self.matrices.clear();
        self.summaries.clear();
    }

    fn key<R: Hash>(&self, catalog: &Catalog, request: &R) -> u64 {
        let mut hasher = FxHasher::default();
        catalog.fingerprint().hash(&mut hasher);
        request.hash(&mut hasher);
        self.config.hash(&mut hasher);
        hasher.finish()
    }
}

impl Default for Engine {
    fn default() -> Self {
        Engine::new(EngineConfig::default())
    }
}
