use async_trait::async_trait;

use reelhouse_core::{MovieId, StoreResult};

use crate::Movie;

/// Storage port for the movie catalog.
///
/// Stock mutations are *conditional writes*: the stock check and the update
/// happen atomically inside the store, so concurrent checkouts cannot drive
/// stock below zero.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Insert a new movie. Fails with `Conflict` if the id already exists.
    async fn insert(&self, movie: Movie) -> StoreResult<()>;

    /// Fetch a movie by id.
    async fn get(&self, id: MovieId) -> StoreResult<Option<Movie>>;

    /// All movies, unordered.
    async fn list(&self) -> StoreResult<Vec<Movie>>;

    /// Take one copy out of stock. Fails with `NotFound` for an unknown id
    /// and `Conflict` when no copies remain. Returns the updated movie.
    async fn decrement_stock(&self, id: MovieId) -> StoreResult<Movie>;

    /// Put one copy back in stock. Fails with `NotFound` for an unknown id.
    /// Returns the updated movie.
    async fn increment_stock(&self, id: MovieId) -> StoreResult<Movie>;
}
