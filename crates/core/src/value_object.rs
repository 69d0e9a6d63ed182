//! Value object trait: equality by value, not identity.

/// Marker trait for value objects.
///
/// Value objects are immutable and compared by their attribute values. To
/// "modify" one, build a new one. [`crate::Money`] is the canonical example:
/// two amounts of 12.50 are interchangeable, whereas two catalog items are
/// told apart by name (see [`crate::Entity`]).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
