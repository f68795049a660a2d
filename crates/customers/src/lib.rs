//! Customers domain module.
//!
//! Business rules for rental-service members, implemented purely as
//! deterministic domain logic (no IO, no HTTP, no storage).

pub mod customer;
pub mod store;

pub use customer::Customer;
pub use store::CustomerStore;
