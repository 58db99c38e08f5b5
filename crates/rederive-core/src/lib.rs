//! rederive-core: Core types and traits for the rederive engine
//!
//! This crate provides the foundational pieces the engine is built from:
//! the cache-key model and default serialization rules, the computation
//! record with its dependency set, and the computation cache contract with
//! its default in-memory store.

mod cache;
mod computation;
mod error;
mod key;

pub use cache::{ComputationCache, MemoryStore};
pub use computation::{Computation, DepSet, ObserverCall};
pub use error::{Error, Result};
pub use key::{CacheKey, default_cache_key, observer_key};
