//! Value object trait: equality by value, not identity.
//!
//! Value objects are domain objects that have **no identity** - they are defined
//! entirely by their attribute values. Two value objects with the same values are
//! considered equal.

/// Marker trait for value objects.
///
/// Value objects are **immutable** and **compared by value**. To "modify" one,
/// create a new one with the new values; this keeps them safe to share and lets
/// them behave like primitives.
///
/// ## Value Object vs Entity
///
/// - **Value Object**: No identity (two value objects with same values are equal)
/// - **Entity**: Has identity (two entities with same ID are the same entity)
///
/// Example:
/// - `Genre { name: "Action" }` is a value object
/// - `Movie { id: MovieId(...), title: "..." }` is an entity
///
/// The trait requires `Clone` (values are copied, not referenced), `PartialEq`
/// (compared by attributes) and `Debug` (logging, test output).
pub trait ValueObject: Clone + PartialEq + core::fmt::Debug {}
