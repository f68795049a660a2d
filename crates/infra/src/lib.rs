//! Infrastructure layer: storage adapters behind the domain store ports.
//!
//! Two families of implementations: in-memory (tests/dev) and Postgres
//! (production). Both honor the same conditional-write semantics, so the
//! processors behave identically over either.

pub mod store;


pub use store::{
    InMemoryCustomerStore, InMemoryMovieStore, InMemoryRentalStore, PostgresCustomerStore,
    PostgresMovieStore, PostgresRentalStore, PostgresStores,
};
