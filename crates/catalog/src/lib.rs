//! Catalog domain module.
//!
//! Business rules for the movie catalog and its rentable stock, implemented
//! purely as deterministic domain logic (no IO, no HTTP, no storage).

pub mod movie;
pub mod store;

pub use movie::{Genre, Movie};
pub use store::MovieStore;
