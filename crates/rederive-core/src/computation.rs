//! Computation records and dependency tracking

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

type ReplayFn = Arc<dyn Fn() -> bool + Send + Sync>;

/// One observer invocation recorded inside a selector computation.
///
/// The replay closure captures everything change detection needs (the
/// reader, the invocation argument, the observed result, the equality
/// predicate and a handle to the owning context), so re-checking a
/// dependency never looks the observer up again. Replay reads the owning
/// context's current state directly; it does not pass through the
/// evaluation stack and therefore never registers new dependencies.
#[derive(Clone)]
pub struct ObserverCall {
    key: String,
    changed: ReplayFn,
}

impl ObserverCall {
    /// Record a call under its dependency key with its replay closure.
    pub fn new(key: impl Into<String>, changed: impl Fn() -> bool + Send + Sync + 'static) -> Self {
        Self {
            key: key.into(),
            changed: Arc::new(changed),
        }
    }

    /// The dependency key this call was recorded under.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Re-invoke the reader against current state and report inequality.
    pub fn has_changed(&self) -> bool {
        (self.changed)()
    }
}

impl fmt::Debug for ObserverCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverCall").field("key", &self.key).finish()
    }
}

/// The dependency half of a computation.
///
/// An index from dependency key to [`ObserverCall`] plus the first-seen
/// order of those keys. The index is the source of truth; the order list
/// tracks it so iteration and introspection stay in recording order.
#[derive(Clone, Default)]
pub struct DepSet {
    index: HashMap<String, ObserverCall>,
    order: Vec<String>,
}

impl DepSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite by dependency key.
    ///
    /// An observer invoked several times in one computation keeps a single
    /// entry carrying the latest observed value.
    pub fn record(&mut self, call: ObserverCall) {
        if !self.index.contains_key(call.key()) {
            self.order.push(call.key().to_string());
        }
        self.index.insert(call.key().to_string(), call);
    }

    /// Assign another set's entries over this index.
    pub fn merge(&mut self, other: &DepSet) {
        for key in &other.order {
            if let Some(call) = other.index.get(key) {
                self.record(call.clone());
            }
        }
    }

    /// Replay every recorded call in order, short-circuiting on the first
    /// one whose current value no longer matches.
    pub fn changed(&self) -> bool {
        self.order
            .iter()
            .any(|key| self.index.get(key).is_some_and(ObserverCall::has_changed))
    }

    /// Ordered dependency keys, for introspection.
    pub fn keys(&self) -> Vec<String> {
        self.order.clone()
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}

impl fmt::Debug for DepSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DepSet").field("keys", &self.order).finish()
    }
}

/// The cached product of one selector invocation.
///
/// A computation without a result is a placeholder written into the slot
/// before `compute` runs; lookups treat it as a miss, which is what keeps
/// an unwinding compute from ever exposing a stale previous result.
#[derive(Clone, Debug)]
pub struct Computation<T> {
    /// The computed result, absent while a recompute is in flight
    pub result: Option<T>,
    /// Dependencies the result was derived from
    pub deps: DepSet,
}

impl<T> Computation<T> {
    /// Placeholder slot written before `compute` runs.
    pub fn pending(deps: DepSet) -> Self {
        Self { result: None, deps }
    }

    /// Completed computation.
    pub fn finished(result: T, deps: DepSet) -> Self {
        Self {
            result: Some(result),
            deps,
        }
    }

    /// Canned computation with no dependencies, as installed by mocks.
    ///
    /// With nothing to replay, change detection always passes, so the
    /// value persists until the cache is cleared or the slot overwritten.
    pub fn mocked(result: T) -> Self {
        Self::finished(result, DepSet::new())
    }
}
