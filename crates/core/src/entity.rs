//! Entity trait: things that keep their identity while their attributes change.

/// An object identified by a key rather than by its attribute values.
///
/// In the shop, a catalog item is identified by its name: two items with the
/// same name are the same item, whatever their price.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Clone + Eq + core::hash::Hash + core::fmt::Debug;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;

    /// Identity comparison (ignores every attribute but the id).
    fn is_same_as(&self, other: &Self) -> bool
    where
        Self: Sized,
    {
        self.id() == other.id()
    }
}
