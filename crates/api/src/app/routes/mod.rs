use axum::{routing::get, Router};

pub mod customers;
pub mod movies;
pub mod rentals;
pub mod returns;
pub mod system;

/// Router for all authenticated endpoints (mounted under `/api`).
pub fn router() -> Router {
    Router::new()
        .route("/whoami", get(system::whoami))
        .nest("/returns", returns::router())
        .nest("/rentals", rentals::router())
        .nest("/movies", movies::router())
        .nest("/customers", customers::router())
}
