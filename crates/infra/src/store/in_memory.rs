//! In-memory store implementations.
//!
//! Intended for tests/dev. Conditional writes re-check their condition while
//! holding the write lock, which gives the same exactly-one-winner behavior
//! as the guarded SQL updates in the Postgres stores.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use reelhouse_catalog::{Movie, MovieStore};
use reelhouse_core::{CustomerId, MovieId, RentalId, StoreError, StoreResult};
use reelhouse_customers::{Customer, CustomerStore};
use reelhouse_rentals::{Rental, RentalStore};

/// In-memory customer store.
#[derive(Debug, Default)]
pub struct InMemoryCustomerStore {
    customers: RwLock<HashMap<CustomerId, Customer>>,
}

impl InMemoryCustomerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl CustomerStore for InMemoryCustomerStore {
    async fn insert(&self, customer: Customer) -> StoreResult<()> {
        let mut customers = self.customers.write().await;
        if customers.contains_key(&customer.id_typed()) {
            return Err(StoreError::conflict("customer id already exists"));
        }
        customers.insert(customer.id_typed(), customer);
        Ok(())
    }

    async fn get(&self, id: CustomerId) -> StoreResult<Option<Customer>> {
        Ok(self.customers.read().await.get(&id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Customer>> {
        Ok(self.customers.read().await.values().cloned().collect())
    }
}

/// In-memory movie store.
#[derive(Debug, Default)]
pub struct InMemoryMovieStore {
    movies: RwLock<HashMap<MovieId, Movie>>,
}

impl InMemoryMovieStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MovieStore for InMemoryMovieStore {
    async fn insert(&self, movie: Movie) -> StoreResult<()> {
        let mut movies = self.movies.write().await;
        if movies.contains_key(&movie.id_typed()) {
            return Err(StoreError::conflict("movie id already exists"));
        }
        movies.insert(movie.id_typed(), movie);
        Ok(())
    }

    async fn get(&self, id: MovieId) -> StoreResult<Option<Movie>> {
        Ok(self.movies.read().await.get(&id).cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Movie>> {
        Ok(self.movies.read().await.values().cloned().collect())
    }

    async fn decrement_stock(&self, id: MovieId) -> StoreResult<Movie> {
        let mut movies = self.movies.write().await;
        let movie = movies.get_mut(&id).ok_or(StoreError::NotFound)?;
        // The stock invariant is the condition; checked under the write lock.
        movie
            .take_one()
            .map_err(|_| StoreError::conflict("movie is out of stock"))?;
        Ok(movie.clone())
    }

    async fn increment_stock(&self, id: MovieId) -> StoreResult<Movie> {
        let mut movies = self.movies.write().await;
        let movie = movies.get_mut(&id).ok_or(StoreError::NotFound)?;
        movie.restore_one();
        Ok(movie.clone())
    }
}

/// In-memory rental store.
#[derive(Debug, Default)]
pub struct InMemoryRentalStore {
    rentals: RwLock<HashMap<RentalId, Rental>>,
}

impl InMemoryRentalStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RentalStore for InMemoryRentalStore {
    async fn create(&self, rental: Rental) -> StoreResult<()> {
        let mut rentals = self.rentals.write().await;
        if rentals.contains_key(&rental.id_typed()) {
            return Err(StoreError::conflict("rental id already exists"));
        }
        rentals.insert(rental.id_typed(), rental);
        Ok(())
    }

    async fn get(&self, id: RentalId) -> StoreResult<Option<Rental>> {
        Ok(self.rentals.read().await.get(&id).cloned())
    }

    async fn find_for_pair(
        &self,
        customer_id: CustomerId,
        movie_id: MovieId,
    ) -> StoreResult<Option<Rental>> {
        let rentals = self.rentals.read().await;

        let mut best: Option<&Rental> = None;
        for rental in rentals.values() {
            if rental.customer().id != customer_id || rental.movie().id != movie_id {
                continue;
            }
            best = match best {
                None => Some(rental),
                // Open beats closed; ties break to the later checkout.
                Some(current)
                    if (rental.is_open(), rental.date_out())
                        > (current.is_open(), current.date_out()) =>
                {
                    Some(rental)
                }
                Some(current) => Some(current),
            };
        }

        Ok(best.cloned())
    }

    async fn list(&self) -> StoreResult<Vec<Rental>> {
        Ok(self.rentals.read().await.values().cloned().collect())
    }

    async fn mark_returned(
        &self,
        id: RentalId,
        returned_at: DateTime<Utc>,
        fee: u64,
    ) -> StoreResult<Rental> {
        let mut rentals = self.rentals.write().await;
        let rental = rentals.get_mut(&id).ok_or(StoreError::NotFound)?;
        // The open-check is the condition; checked under the write lock.
        rental
            .close(returned_at, fee)
            .map_err(|_| StoreError::conflict("rental is already closed"))?;
        Ok(rental.clone())
    }
}

#[cfg(test)]
mod tests {
    use reelhouse_catalog::Genre;

    use super::*;

    fn test_customer() -> Customer {
        Customer::new(CustomerId::new(), "Ada Lovelace", "555-0100", false).unwrap()
    }

    fn test_movie(stock: i64) -> Movie {
        Movie::new(
            MovieId::new(),
            "Airplane!",
            Genre::new("Comedy").unwrap(),
            2,
            stock,
        )
        .unwrap()
    }

    #[tokio::test]
    async fn insert_rejects_duplicate_movie_ids() {
        let store = InMemoryMovieStore::new();
        let movie = test_movie(1);

        store.insert(movie.clone()).await.unwrap();
        let err = store.insert(movie).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn decrement_stock_conflicts_once_empty() {
        let store = InMemoryMovieStore::new();
        let movie = test_movie(1);
        let id = movie.id_typed();
        store.insert(movie).await.unwrap();

        let updated = store.decrement_stock(id).await.unwrap();
        assert_eq!(updated.number_in_stock(), 0);

        let err = store.decrement_stock(id).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn decrement_stock_reports_missing_movie() {
        let store = InMemoryMovieStore::new();
        let err = store.decrement_stock(MovieId::new()).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound));
    }

    #[tokio::test]
    async fn mark_returned_closes_exactly_once() {
        let store = InMemoryRentalStore::new();
        let rental = Rental::open(&test_customer(), &test_movie(1), Utc::now());
        let id = rental.id_typed();
        store.create(rental).await.unwrap();

        let closed = store.mark_returned(id, Utc::now(), 2).await.unwrap();
        assert!(!closed.is_open());
        assert_eq!(closed.rental_fee(), Some(2));

        let err = store.mark_returned(id, Utc::now(), 2).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict(_)));
    }

    #[tokio::test]
    async fn find_for_pair_prefers_the_open_rental() {
        let store = InMemoryRentalStore::new();
        let customer = test_customer();
        let movie = test_movie(5);

        let mut closed = Rental::open(&customer, &movie, Utc::now());
        closed.close(Utc::now(), 2).unwrap();
        store.create(closed).await.unwrap();

        let open = Rental::open(&customer, &movie, Utc::now());
        let open_id = open.id_typed();
        store.create(open).await.unwrap();

        let found = store
            .find_for_pair(customer.id_typed(), movie.id_typed())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id_typed(), open_id);
        assert!(found.is_open());
    }

    #[tokio::test]
    async fn find_for_pair_misses_other_pairs() {
        let store = InMemoryRentalStore::new();
        let customer = test_customer();
        let movie = test_movie(5);
        store
            .create(Rental::open(&customer, &movie, Utc::now()))
            .await
            .unwrap();

        let found = store
            .find_for_pair(CustomerId::new(), movie.id_typed())
            .await
            .unwrap();
        assert!(found.is_none());
    }
}
