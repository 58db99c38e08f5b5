//! Error types for the rederive engine

use thiserror::Error;

/// Contract errors raised by the engine itself.
///
/// User code running inside readers, compute functions, equality
/// predicates, serializers and caches panics through to the caller
/// unchanged; these kinds cover only the engine's own argument contracts.
/// Reader arity is encoded in the typed constructors, so in practice they
/// act as defensive assertions with pinned message texts.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Reader declared with more than the (state, argument) parameters
    #[error("Observer methods cannot receive more than two arguments")]
    ObserverArity,

    /// Observer invoked with more than one argument
    #[error("Observer methods cannot be invoked with more than one argument")]
    InvocationArity,
}

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;
