use axum::{http::StatusCode, response::IntoResponse, Json};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub async fn whoami(
    axum::extract::Extension(auth): axum::extract::Extension<crate::context::AuthContext>,
) -> impl IntoResponse {
    Json(serde_json::json!({
        "user_id": auth.user_id().to_string(),
    }))
}
