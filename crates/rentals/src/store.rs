use async_trait::async_trait;
use chrono::{DateTime, Utc};

use reelhouse_core::{CustomerId, MovieId, RentalId, StoreResult};

use crate::rental::Rental;

/// Storage port for rentals.
///
/// `mark_returned` is a *conditional write*: the open-check and the close
/// happen atomically inside the store. Of any set of concurrent closes for
/// the same rental, exactly one succeeds; the rest observe `Conflict`.
#[async_trait]
pub trait RentalStore: Send + Sync {
    /// Insert a newly opened rental. Fails with `Conflict` if the id exists.
    async fn create(&self, rental: Rental) -> StoreResult<()>;

    /// Fetch a rental by id.
    async fn get(&self, id: RentalId) -> StoreResult<Option<Rental>>;

    /// The rental for a (customer, movie) pair, if any.
    ///
    /// When the pair has several rentals, an open one is preferred, then the
    /// most recently opened.
    async fn find_for_pair(
        &self,
        customer_id: CustomerId,
        movie_id: MovieId,
    ) -> StoreResult<Option<Rental>>;

    /// All rentals, unordered.
    async fn list(&self) -> StoreResult<Vec<Rental>>;

    /// Close an open rental: stamp `returned_at` and the fee together.
    ///
    /// Fails with `Conflict` if the rental is already closed and `NotFound`
    /// if it does not exist. Returns the closed rental.
    async fn mark_returned(
        &self,
        id: RentalId,
        returned_at: DateTime<Utc>,
        fee: u64,
    ) -> StoreResult<Rental>;
}
