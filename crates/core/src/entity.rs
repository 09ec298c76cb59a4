//! Entity trait: identity + continuity across state changes.

/// Entity marker + minimal interface.
///
/// An account keeps its identity while its balance changes; two entities with
/// the same id are the same entity regardless of their current state.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
