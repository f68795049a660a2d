pub mod in_memory;
pub mod postgres;

pub use in_memory::{InMemoryCustomerStore, InMemoryMovieStore, InMemoryRentalStore};
pub use postgres::{
    PostgresCustomerStore, PostgresMovieStore, PostgresRentalStore, PostgresStores,
};
