//! Per-batch memoization of property lookups.

use crate::error::FluidResult;
use crate::provider::PropertyProvider;
use crate::refrigerant::Refrigerant;
use crate::state::{Property, StateInput};
use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

type Key = (Refrigerant, Property, (u8, u64, u64));

/// Hit/miss counters for a memoized provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

/// Wraps a provider and caches results keyed by exact input.
///
/// Intended to live for one batch; create it alongside the batch and drop it after.
/// Errors are cached too, so a bad state is only evaluated once.
pub struct MemoizedProvider<P> {
    inner: P,
    cache: Mutex<HashMap<Key, FluidResult<f64>>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<P: PropertyProvider> MemoizedProvider<P> {
    pub fn new(inner: P) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    pub fn stats(&self) -> CacheStats {
        let entries = self.cache.lock().map(|c| c.len()).unwrap_or(0);
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries,
        }
    }
}

impl<P: PropertyProvider> PropertyProvider for MemoizedProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn supports(&self, refrigerant: Refrigerant) -> bool {
        self.inner.supports(refrigerant)
    }

    fn property(
        &self,
        refrigerant: Refrigerant,
        output: Property,
        input: StateInput,
    ) -> FluidResult<f64> {
        let key = (refrigerant, output, input.key());

        // Poisoned lock: fall through to the backend uncached.
        if let Ok(cache) = self.cache.lock()
            && let Some(cached) = cache.get(&key)
        {
            self.hits.fetch_add(1, Ordering::Relaxed);
            return cached.clone();
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let result = self.inner.property(refrigerant, output, input);
        if let Ok(mut cache) = self.cache.lock() {
            cache.insert(key, result.clone());
        }
        result
    }
}
