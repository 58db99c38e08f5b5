//! Selectors: memoized derived computations

use crate::args::SelectorArgs;
use crate::track;
use rederive_core::{
    CacheKey, Computation, ComputationCache, DepSet, MemoryStore, default_cache_key,
};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

#[cfg(feature = "tracing")]
use tracing::{debug, trace};

type ComputeFn<A, T> = Arc<dyn Fn(&A) -> T + Send + Sync>;
type SerializeFn<A> = Arc<dyn Fn(&A) -> CacheKey + Send + Sync>;

/// Options for selector construction.
pub struct SelectorOptions<A, T> {
    cache: Option<Arc<dyn ComputationCache<T>>>,
    serialize: Option<SerializeFn<A>>,
}

impl<A, T> SelectorOptions<A, T> {
    pub fn new() -> Self {
        Self {
            cache: None,
            serialize: None,
        }
    }

    /// Replace the default unbounded in-memory store.
    pub fn cache(mut self, cache: impl ComputationCache<T> + 'static) -> Self {
        self.cache = Some(Arc::new(cache));
        self
    }

    /// Replace the default cache-key rules wholesale.
    pub fn serialize(mut self, serialize: impl Fn(&A) -> CacheKey + Send + Sync + 'static) -> Self {
        self.serialize = Some(Arc::new(serialize));
        self
    }
}

impl<A, T> Default for SelectorOptions<A, T> {
    fn default() -> Self {
        Self::new()
    }
}

/// A memoized derived computation.
///
/// Invocations return the cached result while every observer recorded by
/// the previous computation still reads an equal value; otherwise the
/// compute function runs again with dependency discovery active. Cloning
/// creates a new handle sharing the SAME cache and counter.
pub struct Selector<A, T> {
    compute: ComputeFn<A, T>,
    cache: Arc<dyn ComputationCache<T>>,
    serialize: SerializeFn<A>,
    recomputations: Arc<AtomicU64>,
}

impl<A, T> Selector<A, T>
where
    A: SelectorArgs,
    T: Clone + Send + Sync + 'static,
{
    pub(crate) fn new(
        compute: impl Fn(&A) -> T + Send + Sync + 'static,
        options: SelectorOptions<A, T>,
    ) -> Self {
        Self {
            compute: Arc::new(compute),
            cache: options
                .cache
                .unwrap_or_else(|| Arc::new(MemoryStore::new())),
            serialize: options
                .serialize
                .unwrap_or_else(|| Arc::new(|args: &A| default_cache_key(&args.to_values()))),
            recomputations: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Invoke the selector.
    ///
    /// Hit or miss, the dependency set of the computation at this cache
    /// key is merged into every enclosing computation in progress, which
    /// is how dependency sets propagate up the call chain.
    pub fn call(&self, args: A) -> T {
        let key = (self.serialize)(&args);
        let cached = self.cache.get(&key);

        if let Some(computation) = &cached {
            if let Some(result) = &computation.result {
                if !computation.deps.changed() {
                    #[cfg(feature = "tracing")]
                    debug!(target: "rederive", key = %key, "cache hit");
                    track::merge_into_open_frames(&computation.deps);
                    return result.clone();
                }
            }
        }

        let seed = cached.map(|computation| computation.deps).unwrap_or_default();
        let (result, deps) = self.recompute(key, seed, &args);
        track::merge_into_open_frames(&deps);
        result
    }

    fn recompute(&self, key: CacheKey, seed: DepSet, args: &A) -> (T, DepSet) {
        #[cfg(feature = "tracing")]
        debug!(target: "rederive", key = %key, "cache miss, recomputing");

        // Invalidate the slot before running: an unwinding compute must
        // not leave a usable previous result behind, and every path that
        // runs the compute function counts as a recomputation.
        self.cache.set(key.clone(), Computation::pending(seed.clone()));
        self.recomputations.fetch_add(1, Ordering::Relaxed);

        let compute = Arc::clone(&self.compute);
        let (deps, result) = track::with_frame(seed, || compute(args));

        self.cache
            .set(key, Computation::finished(result.clone(), deps.clone()));
        (result, deps)
    }

    /// Ordered dependency keys recorded for the computation at `args`'
    /// cache key; empty when no computation exists.
    pub fn dependencies(&self, args: &A) -> Vec<String> {
        let key = (self.serialize)(args);
        self.cache
            .get(&key)
            .map(|computation| computation.deps.keys())
            .unwrap_or_default()
    }

    /// Number of times the compute function has run.
    pub fn recomputations(&self) -> u64 {
        self.recomputations.load(Ordering::Relaxed)
    }

    /// Drop every cached computation; the next call is a guaranteed miss.
    pub fn clear_cache(&self) {
        #[cfg(feature = "tracing")]
        trace!(target: "rederive", "cache cleared");
        self.cache.clear();
    }

    /// Install a canned result for `args`' cache key.
    ///
    /// ```ignore
    /// selector.mock(&args).result(value);
    /// ```
    pub fn mock(&self, args: &A) -> Mock<T> {
        Mock {
            cache: Arc::clone(&self.cache),
            key: (self.serialize)(args),
        }
    }
}

impl<A, T> Clone for Selector<A, T> {
    fn clone(&self) -> Self {
        Self {
            compute: Arc::clone(&self.compute),
            cache: Arc::clone(&self.cache),
            serialize: Arc::clone(&self.serialize),
            recomputations: Arc::clone(&self.recomputations),
        }
    }
}

impl<A, T> fmt::Debug for Selector<A, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("recomputations", &self.recomputations.load(Ordering::Relaxed))
            .finish()
    }
}

/// Handle returned by [`Selector::mock`].
pub struct Mock<T> {
    cache: Arc<dyn ComputationCache<T>>,
    key: CacheKey,
}

impl<T> Mock<T> {
    /// Install `value` under the mocked cache key.
    ///
    /// The installed computation has no dependencies, so change detection
    /// always passes: subsequent invocations with this key return `value`
    /// without running the compute function or touching the recomputation
    /// counter, until `clear_cache` or an explicit overwrite.
    pub fn result(self, value: T) {
        self.cache.set(self.key, Computation::mocked(value));
    }
}
