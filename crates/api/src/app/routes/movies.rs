use std::sync::Arc;

use axum::{
    extract::{Extension, Path},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};

use reelhouse_catalog::{Genre, Movie};
use reelhouse_core::MovieId;

use crate::app::services::AppServices;
use crate::app::{dto, errors};

pub fn router() -> Router {
    Router::new()
        .route("/", post(create_movie).get(list_movies))
        .route("/:id", get(get_movie))
}

pub async fn create_movie(
    Extension(services): Extension<Arc<AppServices>>,
    Json(body): Json<dto::CreateMovieRequest>,
) -> axum::response::Response {
    let genre = match Genre::new(body.genre) {
        Ok(g) => g,
        Err(e) => return errors::domain_error_to_response(e),
    };

    let movie = match Movie::new(
        MovieId::new(),
        body.title,
        genre,
        body.daily_rental_rate,
        body.number_in_stock,
    ) {
        Ok(m) => m,
        Err(e) => return errors::domain_error_to_response(e),
    };

    if let Err(e) = services.movies.insert(movie.clone()).await {
        return errors::store_error_to_response(e);
    }

    (StatusCode::CREATED, Json(dto::movie_to_json(&movie))).into_response()
}

pub async fn list_movies(
    Extension(services): Extension<Arc<AppServices>>,
) -> axum::response::Response {
    match services.movies.list().await {
        Ok(movies) => {
            let items = movies.iter().map(dto::movie_to_json).collect::<Vec<_>>();
            (StatusCode::OK, Json(serde_json::json!({ "items": items }))).into_response()
        }
        Err(e) => errors::store_error_to_response(e),
    }
}

pub async fn get_movie(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> axum::response::Response {
    let movie_id: MovieId = match id.parse() {
        Ok(v) => v,
        Err(_) => {
            return errors::json_error(StatusCode::BAD_REQUEST, "invalid_id", "invalid movie id")
        }
    };

    match services.movies.get(movie_id).await {
        Ok(Some(movie)) => (StatusCode::OK, Json(dto::movie_to_json(&movie))).into_response(),
        Ok(None) => errors::json_error(StatusCode::NOT_FOUND, "not_found", "movie not found"),
        Err(e) => errors::store_error_to_response(e),
    }
}
