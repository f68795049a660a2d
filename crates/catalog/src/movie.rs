use serde::{Deserialize, Serialize};

use reelhouse_core::{DomainError, DomainResult, Entity, MovieId, ValueObject};

/// Genre classification for catalog titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Genre {
    name: String,
}

impl Genre {
    pub fn new(name: impl Into<String>) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::validation("genre name cannot be empty"));
        }
        Ok(Self { name })
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl ValueObject for Genre {}

/// A title carried by the catalog, with its rentable stock.
///
/// Stock counts physical copies; the non-negative invariant is enforced on
/// every decrement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movie {
    id: MovieId,
    title: String,
    genre: Genre,
    /// Price per rental day in smallest currency unit.
    daily_rental_rate: u64,
    number_in_stock: i64,
}

impl Movie {
    /// Upper bound for `daily_rental_rate`, in smallest currency units.
    ///
    /// Rates above this are rejected at construction, which keeps fee
    /// arithmetic (days times rate) inside `u64` for any representable
    /// rental span.
    pub const MAX_DAILY_RATE: u64 = 1_000_000;

    pub fn new(
        id: MovieId,
        title: impl Into<String>,
        genre: Genre,
        daily_rental_rate: u64,
        number_in_stock: i64,
    ) -> DomainResult<Self> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(DomainError::validation("title cannot be empty"));
        }
        if daily_rental_rate > Self::MAX_DAILY_RATE {
            return Err(DomainError::validation(format!(
                "daily rental rate cannot exceed {}",
                Self::MAX_DAILY_RATE
            )));
        }
        if number_in_stock < 0 {
            return Err(DomainError::validation("stock cannot be negative"));
        }

        Ok(Self {
            id,
            title,
            genre,
            daily_rental_rate,
            number_in_stock,
        })
    }

    /// Reassemble a movie from previously persisted state.
    ///
    /// For storage adapters; assumes the fields already passed validation.
    pub fn from_parts(
        id: MovieId,
        title: String,
        genre: Genre,
        daily_rental_rate: u64,
        number_in_stock: i64,
    ) -> Self {
        Self {
            id,
            title,
            genre,
            daily_rental_rate,
            number_in_stock,
        }
    }

    pub fn id_typed(&self) -> MovieId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn genre(&self) -> &Genre {
        &self.genre
    }

    pub fn daily_rental_rate(&self) -> u64 {
        self.daily_rental_rate
    }

    pub fn number_in_stock(&self) -> i64 {
        self.number_in_stock
    }

    /// Invariant helper: whether a copy can be checked out right now.
    pub fn in_stock(&self) -> bool {
        self.number_in_stock > 0
    }

    /// Take one copy off the shelf (checkout).
    pub fn take_one(&mut self) -> DomainResult<()> {
        if self.number_in_stock <= 0 {
            return Err(DomainError::invariant("stock cannot go negative"));
        }
        self.number_in_stock -= 1;
        Ok(())
    }

    /// Put one copy back on the shelf (return).
    pub fn restore_one(&mut self) {
        self.number_in_stock += 1;
    }
}

impl Entity for Movie {
    type Id = MovieId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

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

    #[test]
    fn rejects_blank_title() {
        let err = Movie::new(
            MovieId::new(),
            "  ",
            Genre::new("Comedy").unwrap(),
            2,
            10,
        )
        .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for blank title"),
        }
    }

    #[test]
    fn rejects_blank_genre_name() {
        let err = Genre::new("").unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for blank genre"),
        }
    }

    #[test]
    fn rejects_a_daily_rate_beyond_the_cap() {
        let err = Movie::new(
            MovieId::new(),
            "Airplane!",
            Genre::new("Comedy").unwrap(),
            Movie::MAX_DAILY_RATE + 1,
            10,
        )
        .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for an excessive daily rate"),
        }

        // The cap itself is a valid rate.
        assert!(
            Movie::new(
                MovieId::new(),
                "Airplane!",
                Genre::new("Comedy").unwrap(),
                Movie::MAX_DAILY_RATE,
                10,
            )
            .is_ok()
        );
    }

    #[test]
    fn rejects_negative_initial_stock() {
        let err = Movie::new(
            MovieId::new(),
            "Airplane!",
            Genre::new("Comedy").unwrap(),
            2,
            -1,
        )
        .unwrap_err();
        match err {
            DomainError::Validation(_) => {}
            _ => panic!("Expected Validation error for negative stock"),
        }
    }

    #[test]
    fn take_one_decrements_until_empty() {
        let mut movie = test_movie(2);
        assert!(movie.in_stock());

        movie.take_one().unwrap();
        movie.take_one().unwrap();
        assert_eq!(movie.number_in_stock(), 0);
        assert!(!movie.in_stock());

        let err = movie.take_one().unwrap_err();
        match err {
            DomainError::InvariantViolation(_) => {}
            _ => panic!("Expected InvariantViolation when taking from empty stock"),
        }
    }

    #[test]
    fn restore_one_increments_stock() {
        let mut movie = test_movie(0);
        movie.restore_one();
        assert_eq!(movie.number_in_stock(), 1);
        assert!(movie.in_stock());
    }
}
