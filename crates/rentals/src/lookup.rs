use crate::rental::Rental;

/// Outcome of looking up the rental for a (customer, movie) pair.
///
/// Distinguishes "never rented" from "already brought back" so the API can
/// answer not-found for the former and reject the latter as a duplicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RentalLookup {
    /// No rental exists for the pair.
    NotFound,
    /// The rental for the pair is already closed.
    AlreadyClosed(Rental),
    /// An open rental awaits return.
    Open(Rental),
}

impl RentalLookup {
    /// Classify a store lookup result.
    pub fn classify(found: Option<Rental>) -> Self {
        match found {
            None => RentalLookup::NotFound,
            Some(rental) if rental.is_open() => RentalLookup::Open(rental),
            Some(rental) => RentalLookup::AlreadyClosed(rental),
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use reelhouse_catalog::{Genre, Movie};
    use reelhouse_core::{CustomerId, MovieId};
    use reelhouse_customers::Customer;

    use super::*;

    fn open_rental() -> Rental {
        let customer = Customer::new(CustomerId::new(), "Ada Lovelace", "555-0100", false).unwrap();
        let movie = Movie::new(
            MovieId::new(),
            "Airplane!",
            Genre::new("Comedy").unwrap(),
            2,
            5,
        )
        .unwrap();
        Rental::open(&customer, &movie, Utc::now())
    }

    #[test]
    fn no_rental_classifies_as_not_found() {
        assert_eq!(RentalLookup::classify(None), RentalLookup::NotFound);
    }

    #[test]
    fn open_rental_classifies_as_open() {
        let rental = open_rental();
        assert_eq!(
            RentalLookup::classify(Some(rental.clone())),
            RentalLookup::Open(rental)
        );
    }

    #[test]
    fn closed_rental_classifies_as_already_closed() {
        let mut rental = open_rental();
        rental.close(Utc::now(), 2).unwrap();
        assert_eq!(
            RentalLookup::classify(Some(rental.clone())),
            RentalLookup::AlreadyClosed(rental)
        );
    }
}
