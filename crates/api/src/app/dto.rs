use serde::Deserialize;

use reelhouse_catalog::Movie;
use reelhouse_customers::Customer;
use reelhouse_rentals::Rental;

// -------------------------
// Request DTOs
// -------------------------

/// Body of `POST /api/returns`.
///
/// Ids arrive as strings; absent fields default to empty so emptiness and
/// format are checked in the handler (a 400, not a deserialize reject).
#[derive(Debug, Deserialize)]
pub struct ProcessReturnRequest {
    #[serde(default, rename = "customerId")]
    pub customer_id: String,
    #[serde(default, rename = "movieId")]
    pub movie_id: String,
}

/// Body of `POST /api/rentals`. Same id handling as returns.
#[derive(Debug, Deserialize)]
pub struct OpenRentalRequest {
    #[serde(default, rename = "customerId")]
    pub customer_id: String,
    #[serde(default, rename = "movieId")]
    pub movie_id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCustomerRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, rename = "isGold")]
    pub is_gold: bool,
}

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default, rename = "dailyRentalRate")]
    pub daily_rental_rate: u64,
    #[serde(default, rename = "numberInStock")]
    pub number_in_stock: i64,
}

// -------------------------
// JSON mapping helpers
// -------------------------

pub fn customer_to_json(customer: &Customer) -> serde_json::Value {
    serde_json::json!({
        "id": customer.id_typed().to_string(),
        "name": customer.name(),
        "phone": customer.phone(),
        "isGold": customer.is_gold(),
    })
}

pub fn movie_to_json(movie: &Movie) -> serde_json::Value {
    serde_json::json!({
        "id": movie.id_typed().to_string(),
        "title": movie.title(),
        "genre": movie.genre().name(),
        "dailyRentalRate": movie.daily_rental_rate(),
        "numberInStock": movie.number_in_stock(),
    })
}

pub fn rental_to_json(rental: &Rental) -> serde_json::Value {
    serde_json::json!({
        "id": rental.id_typed().to_string(),
        "customer": {
            "id": rental.customer().id.to_string(),
            "name": rental.customer().name,
            "phone": rental.customer().phone,
            "isGold": rental.customer().is_gold,
        },
        "movie": {
            "id": rental.movie().id.to_string(),
            "title": rental.movie().title,
            "dailyRentalRate": rental.movie().daily_rental_rate,
        },
        "dateOut": rental.date_out().to_rfc3339(),
        "dateReturned": rental.date_returned().map(|d| d.to_rfc3339()),
        "rentalFee": rental.rental_fee(),
    })
}
