//! rederive: reactive memoization for derived state
//!
//! # Features
//!
//! - **Observers**: cheap, non-memoized state readers with stable identity
//! - **Selectors**: memoized derived computations
//! - **Automatic dependency discovery**: selectors learn which observers
//!   they depend on by watching the call graph during evaluation
//! - **Pull-based invalidation**: cached results are revalidated on lookup
//!   by replaying recorded observer calls against the current state
//! - **Pluggable caches and key serialization** per selector
//!
//! # Quick start
//!
//! ```rust
//! use rederive::prelude::*;
//!
//! #[derive(Clone)]
//! struct AppState {
//!     count: i64,
//! }
//!
//! let ctx = create_context(AppState { count: 1 });
//! let count = ctx.create_observer(|state: &AppState| state.count);
//!
//! let doubled = {
//!     let count = count.clone();
//!     ctx.create_selector(move |_: &()| count.call() * 2)
//! };
//!
//! assert_eq!(doubled.call(()), 2);
//! assert_eq!(doubled.call(()), 2); // cached
//! assert_eq!(doubled.recomputations(), 1);
//!
//! ctx.set_state(AppState { count: 5 });
//! assert_eq!(doubled.call(()), 10); // observed value changed
//! assert_eq!(doubled.recomputations(), 2);
//! ```

mod args;
mod context;
mod global;
mod observer;
mod selector;
mod track;

// Re-export core
pub use rederive_core::*;

pub use args::SelectorArgs;
pub use context::{Context, create_context};
pub use global::{
    create_arg_observer, create_observer, create_selector, default_context, set_state,
};
pub use observer::{ArgObserver, Observer, ObserverOptions};
pub use selector::{Mock, Selector, SelectorOptions};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ArgObserver, CacheKey, Computation, ComputationCache, Context, DepSet, Error, MemoryStore,
        Observer, ObserverOptions, Result, Selector, SelectorArgs, SelectorOptions,
        create_context,
    };
}
