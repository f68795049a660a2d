use std::sync::Arc;

use axum::{
    extract::Extension,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use chrono::Utc;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new().route("/", post(process_return))
}

/// `POST /api/returns`: close the open rental for a (customer, movie) pair.
///
/// The response is the closed rental, `dateReturned` and `rentalFee` included.
pub async fn process_return(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::ProcessReturnRequest>,
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
        .returns
        .process_return(customer_id, movie_id, Utc::now())
        .await
    {
        Ok(rental) => (StatusCode::OK, Json(dto::rental_to_json(&rental))).into_response(),
        Err(e) => errors::return_error_to_response(e),
    }
}
