//! Return processing: close the rental, price it, restock the copy.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{instrument, warn};

use reelhouse_catalog::MovieStore;
use reelhouse_core::{CustomerId, MovieId, StoreError};

use crate::fee::rental_fee;
use crate::lookup::RentalLookup;
use crate::rental::Rental;
use crate::store::RentalStore;

/// Why a return could not be processed.
#[derive(Debug, Error)]
pub enum ReturnError {
    /// No rental exists for the (customer, movie) pair.
    #[error("no rental found for this customer and movie")]
    RentalNotFound,

    /// The rental was already returned, possibly by a concurrent request.
    #[error("return already processed")]
    AlreadyProcessed,

    /// The storage backend failed.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Orchestrates the return workflow over the injected store ports.
pub struct ReturnProcessor {
    rentals: Arc<dyn RentalStore>,
    movies: Arc<dyn MovieStore>,
}

impl ReturnProcessor {
    pub fn new(rentals: Arc<dyn RentalStore>, movies: Arc<dyn MovieStore>) -> Self {
        Self { rentals, movies }
    }

    /// Process the return of `movie_id` by `customer_id` at `returned_at`.
    ///
    /// On success the returned rental carries `date_returned` and
    /// `rental_fee`, and the movie's stock has been incremented. The close
    /// itself is a conditional write, so when two requests race for the same
    /// rental exactly one gets the rental back; the other sees
    /// `AlreadyProcessed` and writes nothing.
    #[instrument(skip(self), fields(customer_id = %customer_id, movie_id = %movie_id))]
    pub async fn process_return(
        &self,
        customer_id: CustomerId,
        movie_id: MovieId,
        returned_at: DateTime<Utc>,
    ) -> Result<Rental, ReturnError> {
        let found = self.rentals.find_for_pair(customer_id, movie_id).await?;

        let rental = match RentalLookup::classify(found) {
            RentalLookup::NotFound => return Err(ReturnError::RentalNotFound),
            RentalLookup::AlreadyClosed(_) => return Err(ReturnError::AlreadyProcessed),
            RentalLookup::Open(rental) => rental,
        };

        let fee = rental_fee(
            rental.date_out(),
            returned_at,
            rental.movie().daily_rental_rate,
        );

        let closed = match self
            .rentals
            .mark_returned(rental.id_typed(), returned_at, fee)
            .await
        {
            Ok(rental) => rental,
            // Closed between lookup and write: a concurrent duplicate won.
            Err(StoreError::Conflict(_)) => return Err(ReturnError::AlreadyProcessed),
            Err(StoreError::NotFound) => return Err(ReturnError::RentalNotFound),
            Err(e) => return Err(ReturnError::Store(e)),
        };

        // Restock only after the close committed; a losing duplicate must not
        // touch stock.
        match self.movies.increment_stock(movie_id).await {
            Ok(_) => {}
            Err(StoreError::NotFound) => {
                // The title left the catalog while the copy was out. The
                // return itself stands; there is just no shelf to restock.
                warn!(movie_id = %movie_id, "rental closed but movie is gone from the catalog");
            }
            Err(e) => return Err(ReturnError::Store(e)),
        }

        Ok(closed)
    }
}
