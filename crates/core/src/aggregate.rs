//! Aggregate root trait for registries that own a consistency boundary.

/// Aggregate root marker + minimal interface.
///
/// An aggregate root is the only entry point for mutating the entities it owns.
/// Callers never hold references into its internals across operations.
pub trait AggregateRoot {
    /// Strongly-typed aggregate identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the aggregate identifier.
    fn id(&self) -> &Self::Id;

    /// Monotonically increasing version of the aggregate's state.
    ///
    /// Typically the number of facts (events) recorded so far.
    fn version(&self) -> u64;
}
