use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;

use reelhouse_core::RentalId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(open_rental).get(list_rentals))
        .route("/:id", get(get_rental))
}

/// `POST /api/rentals`: check a copy out to a customer.
pub async fn open_rental(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::OpenRentalRequest>,
) -> axum::response::Response {
    let customer_id = match errors::parse_required_id(&body.customer_id, "customerId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };
    let movie_id = match errors::parse_required_id(&body.movie_id, "movieId") {
        Ok(v) => v,
        Err(resp) => return resp,
    };

    match services
        .checkout
        .checkout(customer_id, movie_id, Utc::now())
        .await
    {
        Ok(rental) => (StatusCode::CREATED, Json(dto::rental_to_json(&rental))).into_response(),
        Err(e) => errors::checkout_error_to_response(e),
    }
}

pub async fn list_rentals(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.rentals.list().await {
        Ok(rentals) => {
            let items = rentals.iter().map(dto::rental_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_rental(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let rental_id: RentalId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid rental id")
        }
    };

    match services.rentals.get(rental_id).await {
        Ok(Some(rental)) => (StatusCode::OK, Json(dto::rental_to_json(&rental))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "rental not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
