//! Observers: non-memoized state readers with stable identity

use crate::args::arg_value;
use crate::context::ContextInner;
use crate::track;
use rederive_core::{ObserverCall, observer_key};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

type EqualFn<V> = Arc<dyn Fn(&V, &V) -> bool + Send + Sync>;
type ReaderFn<S, V> = Arc<dyn Fn(&S) -> V + Send + Sync>;
type ArgReaderFn<S, A, V> = Arc<dyn Fn(&S, &A) -> V + Send + Sync>;

/// Options for observer construction.
pub struct ObserverOptions<V> {
    is_equal: Option<EqualFn<V>>,
}

impl<V> ObserverOptions<V> {
    pub fn new() -> Self {
        Self { is_equal: None }
    }

    /// Replace the equality predicate used during change detection.
    ///
    /// The default compares observed values with `PartialEq`.
    pub fn is_equal(mut self, predicate: impl Fn(&V, &V) -> bool + Send + Sync + 'static) -> Self {
        self.is_equal = Some(Arc::new(predicate));
        self
    }
}

impl<V> Default for ObserverOptions<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: PartialEq> ObserverOptions<V> {
    fn into_equal_fn(self) -> EqualFn<V> {
        self.is_equal.unwrap_or_else(|| Arc::new(|a, b| a == b))
    }
}

/// A plain observer: reads a value straight off the context state.
///
/// Observers are not memoized; every invocation runs the reader. When a
/// selector computation is in progress, the invocation also registers the
/// observed value with every computation currently being built, which is
/// how enclosing selectors inherit dependencies transitively.
pub struct Observer<S, V> {
    ctx: Arc<ContextInner<S>>,
    id: u64,
    reader: ReaderFn<S, V>,
    is_equal: EqualFn<V>,
}

impl<S, V> Observer<S, V>
where
    S: Send + Sync + 'static,
    V: Clone + PartialEq + Send + Sync + 'static,
{
    pub(crate) fn new(
        ctx: Arc<ContextInner<S>>,
        reader: impl Fn(&S) -> V + Send + Sync + 'static,
        options: ObserverOptions<V>,
    ) -> Self {
        let id = ctx.next_id();
        Self {
            ctx,
            id,
            reader: Arc::new(reader),
            is_equal: options.into_equal_fn(),
        }
    }

    /// Read the current value.
    pub fn call(&self) -> V {
        let result = self.ctx.read_state(|state| (self.reader)(state));
        if track::any_open_frames() {
            track::record_in_open_frames(&self.recorded_call(&result));
        }
        result
    }

    /// The observer's unique identifier, stringified the way keys use it.
    pub fn id(&self) -> String {
        self.id.to_string()
    }

    /// The dependency key recorded for an invocation.
    pub fn key(&self) -> String {
        observer_key(self.id, None)
    }

    fn recorded_call(&self, result: &V) -> ObserverCall {
        let ctx = Arc::clone(&self.ctx);
        let reader = Arc::clone(&self.reader);
        let is_equal = Arc::clone(&self.is_equal);
        let recorded = result.clone();
        ObserverCall::new(self.key(), move || {
            let current = ctx.read_state(|state| reader(state));
            !is_equal(&recorded, &current)
        })
    }
}

impl<S, V> Clone for Observer<S, V> {
    fn clone(&self) -> Self {
        Self {
            ctx: Arc::clone(&self.ctx),
            id: self.id,
            reader: Arc::clone(&self.reader),
            is_equal: Arc::clone(&self.is_equal),
        }
    }
}

impl<S, V> fmt::Debug for Observer<S, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observer").field("id", &self.id).finish()
    }
}

/// An observer parameterized by a single invocation argument.
///
/// The reader sees `(state, argument)`; the argument becomes part of the
/// dependency key, so invocations with distinct arguments are tracked as
/// distinct dependencies of the same observer.
pub struct ArgObserver<S, A, V> {
    ctx: Arc<ContextInner<S>>,
    id: u64,
    reader: ArgReaderFn<S, A, V>,
    is_equal: EqualFn<V>,
}

impl<S, A, V> ArgObserver<S, A, V>
where
    S: Send + Sync + 'static,
    A: Serialize + Clone + Send + Sync + 'static,
    V: Clone + PartialEq + Send + Sync + 'static,
{
    pub(crate) fn new(
        ctx: Arc<ContextInner<S>>,
        reader: impl Fn(&S, &A) -> V + Send + Sync + 'static,
        options: ObserverOptions<V>,
    ) -> Self {
        let id = ctx.next_id();
        Self {
            ctx,
            id,
            reader: Arc::new(reader),
            is_equal: options.into_equal_fn(),
        }
    }

    /// Read the current value for `arg`.
    pub fn call(&self, arg: A) -> V {
        let result = self.ctx.read_state(|state| (self.reader)(state, &arg));
        if track::any_open_frames() {
            track::record_in_open_frames(&self.recorded_call(arg, &result));
        }
        result
    }

    /// The observer's unique identifier, stringified the way keys use it.
    pub fn id(&self) -> String {
        self.id.to_string()
    }

    /// The dependency key recorded for an invocation with `arg`.
    pub fn key_for(&self, arg: &A) -> String {
        observer_key(self.id, Some(&arg_value(arg)))
    }

    fn recorded_call(&self, arg: A, result: &V) -> ObserverCall {
        let key = self.key_for(&arg);
        let ctx = Arc::clone(&self.ctx);
        let reader = Arc::clone(&self.reader);
        let is_equal = Arc::clone(&self.is_equal);
        let recorded = result.clone();
        ObserverCall::new(key, move || {
            let current = ctx.read_state(|state| reader(state, &arg));
            !is_equal(&recorded, &current)
        })
    }
}

impl<S, A, V> Clone for ArgObserver<S, A, V> {
    fn clone(&self) -> Self {
        Self {
            ctx: Arc::clone(&self.ctx),
            id: self.id,
            reader: Arc::clone(&self.reader),
            is_equal: Arc::clone(&self.is_equal),
        }
    }
}

impl<S, A, V> fmt::Debug for ArgObserver<S, A, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgObserver").field("id", &self.id).finish()
    }
}
