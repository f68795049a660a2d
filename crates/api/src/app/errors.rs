use std::str::FromStr;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;

use reelhouse_core::{DomainError, StoreError};
use reelhouse_rentals::{CheckoutError, ReturnError};

/// Map a return outcome to its HTTP status.
///
/// "No rental for the pair" and "already returned" are deliberately distinct
/// statuses (404 vs 400) so callers can tell them apart.
pub fn return_error_to_response(err: ReturnError) -> axum::response::Response {
    match err {
        ReturnError::RentalNotFound => json_error(
            StatusCode::NOT_FOUND,
            "not_found",
            "no rental found for this customer and movie",
        ),
        ReturnError::AlreadyProcessed => json_error(
            StatusCode::BAD_REQUEST,
            "already_processed",
            "return already processed",
        ),
        ReturnError::Store(e) => store_error_to_response(e),
    }
}

pub fn checkout_error_to_response(err: CheckoutError) -> axum::response::Response {
    match err {
        CheckoutError::CustomerNotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "customer not found")
        }
        CheckoutError::MovieNotFound => {
            json_error(StatusCode::NOT_FOUND, "not_found", "movie not found")
        }
        CheckoutError::OutOfStock => json_error(
            StatusCode::BAD_REQUEST,
            "out_of_stock",
            "movie is out of stock",
        ),
        CheckoutError::Store(e) => store_error_to_response(e),
    }
}

pub fn domain_error_to_response(err: DomainError) -> axum::response::Response {
    match err {
        DomainError::Validation(msg) => json_error(StatusCode::BAD_REQUEST, "validation_error", msg),
        DomainError::InvalidId(msg) => json_error(StatusCode::BAD_REQUEST, "invalid_id", msg),
        DomainError::InvariantViolation(msg) => {
            json_error(StatusCode::UNPROCESSABLE_ENTITY, "invariant_violation", msg)
        }
    }
}

pub fn store_error_to_response(err: StoreError) -> axum::response::Response {
    match err {
        StoreError::NotFound => json_error(StatusCode::NOT_FOUND, "not_found", "not found"),
        StoreError::Conflict(msg) => json_error(StatusCode::CONFLICT, "conflict", msg),
        StoreError::Backend(msg) => {
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "store_error", msg)
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// Parse a required id field out of a request body.
///
/// A missing field deserializes to the empty string, so "absent" and "empty"
/// land in the same 400 here instead of a deserialize reject.
pub fn parse_required_id<T: FromStr>(
    raw: &str,
    field: &'static str,
) -> Result<T, axum::response::Response> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            format!("{field} is required"),
        ));
    }

    raw.parse::<T>().map_err(|_| {
        json_error(
            StatusCode::BAD_REQUEST,
            "validation_error",
            format!("{field} must be a well-formed id"),
        )
    })
}
