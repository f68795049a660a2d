use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use reelhouse_catalog::Movie;
use reelhouse_core::{
    CustomerId, DomainError, DomainResult, Entity, MovieId, RentalId, ValueObject,
};
use reelhouse_customers::Customer;

/// Customer details captured on the rental at checkout time.
///
/// Rentals embed a snapshot rather than a reference, so a later profile edit
/// does not rewrite rental history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomerSnapshot {
    pub id: CustomerId,
    pub name: String,
    pub phone: String,
    pub is_gold: bool,
}

impl From<&Customer> for CustomerSnapshot {
    fn from(customer: &Customer) -> Self {
        Self {
            id: customer.id_typed(),
            name: customer.name().to_string(),
            phone: customer.phone().to_string(),
            is_gold: customer.is_gold(),
        }
    }
}

impl ValueObject for CustomerSnapshot {}

/// Movie details captured on the rental at checkout time.
///
/// The embedded `daily_rental_rate` is what the fee is priced from: the rate
/// agreed at checkout, not whatever the catalog says at return time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieSnapshot {
    pub id: MovieId,
    pub title: String,
    pub daily_rental_rate: u64,
}

impl From<&Movie> for MovieSnapshot {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id_typed(),
            title: movie.title().to_string(),
            daily_rental_rate: movie.daily_rental_rate(),
        }
    }
}

impl ValueObject for MovieSnapshot {}

/// A single checkout of one movie copy by one customer.
///
/// Lifecycle: opened at checkout (`date_returned` and `rental_fee` both
/// absent), closed exactly once at return (both present). No other state
/// combination is valid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rental {
    id: RentalId,
    customer: CustomerSnapshot,
    movie: MovieSnapshot,
    date_out: DateTime<Utc>,
    date_returned: Option<DateTime<Utc>>,
    rental_fee: Option<u64>,
}

impl Rental {
    /// Open a rental at checkout.
    pub fn open(customer: &Customer, movie: &Movie, date_out: DateTime<Utc>) -> Self {
        Self {
            id: RentalId::new(),
            customer: customer.into(),
            movie: movie.into(),
            date_out,
            date_returned: None,
            rental_fee: None,
        }
    }

    /// Close the rental: stamp the return time and the priced fee together.
    pub fn close(&mut self, returned_at: DateTime<Utc>, fee: u64) -> DomainResult<()> {
        if self.date_returned.is_some() {
            return Err(DomainError::invariant("rental is already closed"));
        }
        self.date_returned = Some(returned_at);
        self.rental_fee = Some(fee);
        Ok(())
    }

    /// Reassemble a rental from previously persisted state.
    ///
    /// For storage adapters; assumes the fields already passed validation.
    pub fn from_parts(
        id: RentalId,
        customer: CustomerSnapshot,
        movie: MovieSnapshot,
        date_out: DateTime<Utc>,
        date_returned: Option<DateTime<Utc>>,
        rental_fee: Option<u64>,
    ) -> Self {
        Self {
            id,
            customer,
            movie,
            date_out,
            date_returned,
            rental_fee,
        }
    }

    pub fn id_typed(&self) -> RentalId {
        self.id
    }

    pub fn customer(&self) -> &CustomerSnapshot {
        &self.customer
    }

    pub fn movie(&self) -> &MovieSnapshot {
        &self.movie
    }

    pub fn date_out(&self) -> DateTime<Utc> {
        self.date_out
    }

    pub fn date_returned(&self) -> Option<DateTime<Utc>> {
        self.date_returned
    }

    pub fn rental_fee(&self) -> Option<u64> {
        self.rental_fee
    }

    /// Whether the copy is still out.
    pub fn is_open(&self) -> bool {
        self.date_returned.is_none()
    }
}

impl Entity for Rental {
    type Id = RentalId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use reelhouse_catalog::Genre;

    use super::*;

    fn test_customer() -> Customer {
        Customer::new(CustomerId::new(), "Ada Lovelace", "555-0100", false).unwrap()
    }

    fn test_movie() -> Movie {
        Movie::new(
            MovieId::new(),
            "Airplane!",
            Genre::new("Comedy").unwrap(),
            2,
            5,
        )
        .unwrap()
    }

    #[test]
    fn open_rental_has_no_return_and_no_fee() {
        let rental = Rental::open(&test_customer(), &test_movie(), Utc::now());

        assert!(rental.is_open());
        assert_eq!(rental.date_returned(), None);
        assert_eq!(rental.rental_fee(), None);
    }

    #[test]
    fn snapshots_capture_checkout_time_values() {
        let customer = test_customer();
        let movie = test_movie();
        let rental = Rental::open(&customer, &movie, Utc::now());

        assert_eq!(rental.customer().id, customer.id_typed());
        assert_eq!(rental.customer().name, "Ada Lovelace");
        assert_eq!(rental.movie().id, movie.id_typed());
        assert_eq!(rental.movie().daily_rental_rate, 2);
    }

    #[test]
    fn close_stamps_return_and_fee_together() {
        let date_out = Utc::now();
        let returned_at = date_out + Duration::days(3);
        let mut rental = Rental::open(&test_customer(), &test_movie(), date_out);

        rental.close(returned_at, 6).unwrap();

        assert!(!rental.is_open());
        assert_eq!(rental.date_returned(), Some(returned_at));
        assert_eq!(rental.rental_fee(), Some(6));
    }

    #[test]
    fn close_twice_violates_the_lifecycle() {
        let mut rental = Rental::open(&test_customer(), &test_movie(), Utc::now());
        rental.close(Utc::now(), 2).unwrap();

        let err = rental.close(Utc::now(), 2).unwrap_err();
        match err {
            DomainError::InvariantViolation(_) => {}
            _ => panic!("Expected InvariantViolation on double close"),
        }
    }
}
