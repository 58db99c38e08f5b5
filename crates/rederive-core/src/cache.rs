//! Computation cache contract and the default in-memory store

use crate::{CacheKey, Computation};
use dashmap::DashMap;
use std::sync::Arc;

/// Contract every selector cache must honor.
///
/// Retrieval of an absent key yields `None`, distinguishable from any
/// stored computation; `set` replaces the slot wholesale; `clear` resets
/// the store. A user-supplied cache replacing the default must honor the
/// same contract.
pub trait ComputationCache<T>: Send + Sync {
    /// Fetch the computation stored under `key`.
    fn get(&self, key: &CacheKey) -> Option<Computation<T>>;

    /// Store a computation under `key`, replacing any previous slot.
    fn set(&self, key: CacheKey, computation: Computation<T>);

    /// Drop every stored computation.
    fn clear(&self);

    /// Membership probe; implementations without a native one inherit
    /// this lookup-based fallback.
    fn contains(&self, key: &CacheKey) -> bool {
        self.get(key).is_some()
    }
}

/// Unbounded in-memory store, the default behind every selector.
///
/// No eviction and no size bounding; replace it through selector options
/// when either is needed. Cloning creates a new handle to the SAME
/// underlying store.
pub struct MemoryStore<T> {
    slots: Arc<DashMap<CacheKey, Computation<T>>>,
}

impl<T> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            slots: Arc::new(DashMap::new()),
        }
    }
}

impl<T> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for MemoryStore<T> {
    fn clone(&self) -> Self {
        Self {
            slots: Arc::clone(&self.slots),
        }
    }
}

impl<T: Clone + Send + Sync + 'static> ComputationCache<T> for MemoryStore<T> {
    fn get(&self, key: &CacheKey) -> Option<Computation<T>> {
        self.slots.get(key).map(|slot| slot.value().clone())
    }

    fn set(&self, key: CacheKey, computation: Computation<T>) {
        self.slots.insert(key, computation);
    }

    fn clear(&self) {
        self.slots.clear();
    }

    fn contains(&self, key: &CacheKey) -> bool {
        self.slots.contains_key(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::DepSet;

    #[test]
    fn test_absent_key_is_none() {
        let store: MemoryStore<i32> = MemoryStore::new();
        assert!(store.get(&CacheKey::NoArgs).is_none());
        assert!(!store.contains(&CacheKey::NoArgs));
    }

    #[test]
    fn test_set_then_get() {
        let store = MemoryStore::new();
        store.set(CacheKey::from("k"), Computation::finished(5, DepSet::new()));

        let found = store.get(&CacheKey::from("k")).unwrap();
        assert_eq!(found.result, Some(5));
        assert!(store.contains(&CacheKey::from("k")));
    }

    #[test]
    fn test_set_replaces_slot() {
        let store = MemoryStore::new();
        store.set(CacheKey::NoArgs, Computation::finished(1, DepSet::new()));
        store.set(CacheKey::NoArgs, Computation::finished(2, DepSet::new()));

        assert_eq!(store.get(&CacheKey::NoArgs).unwrap().result, Some(2));
    }

    #[test]
    fn test_clear_resets_store() {
        let store = MemoryStore::new();
        store.set(CacheKey::from("a"), Computation::finished(1, DepSet::new()));
        store.set(CacheKey::from("b"), Computation::finished(2, DepSet::new()));

        store.clear();

        assert!(store.get(&CacheKey::from("a")).is_none());
        assert!(store.get(&CacheKey::from("b")).is_none());
    }

    #[test]
    fn test_clone_shares_the_store() {
        let store = MemoryStore::new();
        let handle = store.clone();

        store.set(CacheKey::from("k"), Computation::finished(9, DepSet::new()));
        assert_eq!(handle.get(&CacheKey::from("k")).unwrap().result, Some(9));
    }
}
