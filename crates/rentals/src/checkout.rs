//! Checkout processing: reserve a copy, open the rental.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{instrument, warn};

use reelhouse_catalog::MovieStore;
use reelhouse_core::{CustomerId, MovieId, StoreError};
use reelhouse_customers::CustomerStore;

use crate::rental::Rental;
use crate::store::RentalStore;

/// Why a checkout could not be processed.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("customer not found")]
    CustomerNotFound,

    #[error("movie not found")]
    MovieNotFound,

    #[error("movie is out of stock")]
    OutOfStock,

    /// The storage backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates the checkout workflow over the injected store ports.
pub struct CheckoutProcessor {
    rentals: Arc<dyn RentalStore>,
    movies: Arc<dyn MovieStore>,
    customers: Arc<dyn CustomerStore>,
}

impl CheckoutProcessor {
    pub fn new(
        rentals: Arc<dyn RentalStore>,
        movies: Arc<dyn MovieStore>,
        customers: Arc<dyn CustomerStore>,
    ) -> Self {
        Self {
            rentals,
            movies,
            customers,
        }
    }

    /// Open a rental for `customer_id` on `movie_id` at `date_out`.
    ///
    /// The conditional stock decrement is the gate: two conflicting checkouts
    /// of the last copy cannot both succeed.
    #[instrument(skip(self), fields(customer_id = %customer_id, movie_id = %movie_id))]
    pub async fn checkout(
        &self,
        customer_id: CustomerId,
        movie_id: MovieId,
        date_out: DateTime<Utc>,
    ) -> Result<Rental, CheckoutError> {
        let customer = self
            .customers
            .get(customer_id)
            .await?
            .ok_or(CheckoutError::CustomerNotFound)?;

        // Reserve the copy first; the decrement only succeeds while stock
        // remains.
        let movie = match self.movies.decrement_stock(movie_id).await {
            Ok(movie) => movie,
            Err(StoreError::NotFound) => return Err(CheckoutError::MovieNotFound),
            Err(StoreError::Conflict(_)) => return Err(CheckoutError::OutOfStock),
            Err(e) => return Err(CheckoutError::Store(e)),
        };

        let rental = Rental::open(&customer, &movie, date_out);
        if let Err(e) = self.rentals.create(rental.clone()).await {
            // Undo the reservation so the copy is not stranded.
            if let Err(restore) = self.movies.increment_stock(movie_id).await {
                warn!(
                    movie_id = %movie_id,
                    error = %restore,
                    "failed to restore stock after aborted checkout"
                );
            }
            return Err(CheckoutError::Store(e));
        }

        Ok(rental)
    }
}
