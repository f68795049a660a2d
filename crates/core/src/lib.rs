//! `reelhouse-core` — domain foundation building blocks.
//!
//! This crate contains **pure domain** primitives (no infrastructure concerns)
//! plus the error vocabulary shared by the storage ports.

pub mod entity;
pub mod error;
pub mod id;
pub mod store;
pub mod value_object;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{CustomerId, MovieId, RentalId, UserId};
pub use store::{StoreError, StoreResult};
pub use value_object::ValueObject;
