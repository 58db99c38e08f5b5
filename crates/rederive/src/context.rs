//! Contexts: the unit of isolation

use crate::args::SelectorArgs;
use crate::observer::{ArgObserver, Observer, ObserverOptions};
use crate::selector::{Selector, SelectorOptions};
use parking_lot::RwLock;
use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

pub(crate) struct ContextInner<S> {
    state: RwLock<S>,
    next_observer_id: AtomicU64,
}

impl<S> ContextInner<S> {
    pub(crate) fn read_state<R>(&self, read: impl FnOnce(&S) -> R) -> R {
        read(&self.state.read())
    }

    /// Next observer id; ids are positive and monotonic within a context.
    pub(crate) fn next_id(&self) -> u64 {
        self.next_observer_id.fetch_add(1, Ordering::Relaxed) + 1
    }
}

/// A reactive memoization context.
///
/// Owns the current state value and the observer id counter; observers and
/// selectors are created through it. Contexts are fully isolated from one
/// another: each has its own state and its own id space, and changing one
/// context's state never invalidates selectors that observed none of its
/// observers. Cloning creates a new handle to the SAME context.
pub struct Context<S> {
    inner: Arc<ContextInner<S>>,
}

impl<S: Send + Sync + 'static> Context<S> {
    /// Create a context seeded with `initial` state.
    pub fn new(initial: S) -> Self {
        Self {
            inner: Arc::new(ContextInner {
                state: RwLock::new(initial),
                next_observer_id: AtomicU64::new(0),
            }),
        }
    }

    /// Replace the state value wholesale.
    ///
    /// Cached selector results are not touched; the next lookup decides
    /// validity by replaying recorded observer calls against the new state.
    pub fn set_state(&self, state: S) {
        *self.inner.state.write() = state;
    }

    /// Create an observer reading a value straight off the state.
    pub fn create_observer<V>(
        &self,
        reader: impl Fn(&S) -> V + Send + Sync + 'static,
    ) -> Observer<S, V>
    where
        V: Clone + PartialEq + Send + Sync + 'static,
    {
        self.create_observer_with(reader, ObserverOptions::new())
    }

    /// Create an observer with explicit options.
    pub fn create_observer_with<V>(
        &self,
        reader: impl Fn(&S) -> V + Send + Sync + 'static,
        options: ObserverOptions<V>,
    ) -> Observer<S, V>
    where
        V: Clone + PartialEq + Send + Sync + 'static,
    {
        Observer::new(Arc::clone(&self.inner), reader, options)
    }

    /// Create an observer parameterized by a single argument.
    ///
    /// Each distinct argument yields a distinct dependency key, so one
    /// observer can contribute several dependencies to a computation.
    pub fn create_arg_observer<A, V>(
        &self,
        reader: impl Fn(&S, &A) -> V + Send + Sync + 'static,
    ) -> ArgObserver<S, A, V>
    where
        A: Serialize + Clone + Send + Sync + 'static,
        V: Clone + PartialEq + Send + Sync + 'static,
    {
        self.create_arg_observer_with(reader, ObserverOptions::new())
    }

    /// Create a parameterized observer with explicit options.
    pub fn create_arg_observer_with<A, V>(
        &self,
        reader: impl Fn(&S, &A) -> V + Send + Sync + 'static,
        options: ObserverOptions<V>,
    ) -> ArgObserver<S, A, V>
    where
        A: Serialize + Clone + Send + Sync + 'static,
        V: Clone + PartialEq + Send + Sync + 'static,
    {
        ArgObserver::new(Arc::clone(&self.inner), reader, options)
    }

    /// Create a memoized selector over `compute`.
    pub fn create_selector<A, T>(
        &self,
        compute: impl Fn(&A) -> T + Send + Sync + 'static,
    ) -> Selector<A, T>
    where
        A: SelectorArgs,
        T: Clone + Send + Sync + 'static,
    {
        self.create_selector_with(compute, SelectorOptions::new())
    }

    /// Create a selector with a replacement cache and/or serializer.
    pub fn create_selector_with<A, T>(
        &self,
        compute: impl Fn(&A) -> T + Send + Sync + 'static,
        options: SelectorOptions<A, T>,
    ) -> Selector<A, T>
    where
        A: SelectorArgs,
        T: Clone + Send + Sync + 'static,
    {
        Selector::new(compute, options)
    }
}

impl<S> Clone for Context<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S> std::fmt::Debug for Context<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field(
                "observers",
                &self.inner.next_observer_id.load(Ordering::Relaxed),
            )
            .finish()
    }
}

/// Create a context seeded with an initial state.
pub fn create_context<S: Send + Sync + 'static>(initial: S) -> Context<S> {
    Context::new(initial)
}
