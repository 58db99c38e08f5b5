//! The process-wide default context
//!
//! Convenience entry points over a shared context whose state is an opaque
//! [`serde_json::Value`]. Code that wants typed state or isolation creates
//! its own context with [`create_context`](crate::create_context).

use crate::args::SelectorArgs;
use crate::context::Context;
use crate::observer::{ArgObserver, Observer};
use crate::selector::Selector;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

static DEFAULT: LazyLock<Context<Value>> = LazyLock::new(|| Context::new(Value::Null));

/// A handle to the process-wide default context.
pub fn default_context() -> Context<Value> {
    DEFAULT.clone()
}

/// Create an observer on the default context.
pub fn create_observer<V>(
    reader: impl Fn(&Value) -> V + Send + Sync + 'static,
) -> Observer<Value, V>
where
    V: Clone + PartialEq + Send + Sync + 'static,
{
    DEFAULT.create_observer(reader)
}

/// Create a parameterized observer on the default context.
pub fn create_arg_observer<A, V>(
    reader: impl Fn(&Value, &A) -> V + Send + Sync + 'static,
) -> ArgObserver<Value, A, V>
where
    A: Serialize + Clone + Send + Sync + 'static,
    V: Clone + PartialEq + Send + Sync + 'static,
{
    DEFAULT.create_arg_observer(reader)
}

/// Create a selector on the default context.
pub fn create_selector<A, T>(compute: impl Fn(&A) -> T + Send + Sync + 'static) -> Selector<A, T>
where
    A: SelectorArgs,
    T: Clone + Send + Sync + 'static,
{
    DEFAULT.create_selector(compute)
}

/// Replace the default context's state wholesale.
pub fn set_state(state: Value) {
    DEFAULT.set_state(state);
}
