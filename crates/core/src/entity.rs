//! Entity trait: identity + continuity across state changes.

/// A persisted record addressed by its identifier.
///
/// Services use `id()` as the key when writing a record back to its store.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Ord + core::fmt::Debug + core::fmt::Display;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
