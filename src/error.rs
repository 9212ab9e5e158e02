use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("No route for path: {0}")]
    NotFound(String),
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: &'static str,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error) = match &self {
            AppError::NotFound(path) => {
                tracing::debug!(%path, "No route matched");
                (StatusCode::NOT_FOUND, "not found")
            }
        };

        (status, Json(ErrorBody { error })).into_response()
    }
}
