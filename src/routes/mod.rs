//! HTTP routes.
//!
//! A single liveness route at `/`. Anything else falls through to a JSON 404.
//! Request tracing is enabled via middleware that generates a unique request ID
//! for each incoming request.

pub mod status;

use axum::{
    http::{
        header::{HeaderValue, CACHE_CONTROL},
        Uri,
    },
    middleware,
    routing::get,
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::config::CACHE_CONTROL_STATUS;
use crate::error::AppError;
use crate::middleware::request_id_layer;

/// Creates the Axum router with the liveness route and the not-found fallback.
pub fn create_router() -> Router {
    // Liveness - never cached
    let status_routes = Router::new()
        .route("/", get(status::index))
        .layer(SetResponseHeaderLayer::if_not_present(
            CACHE_CONTROL,
            HeaderValue::from_static(CACHE_CONTROL_STATUS),
        ));

    Router::new()
        .merge(status_routes)
        .fallback(not_found)
        // Request ID middleware - creates root span with request_id for correlation
        .layer(middleware::from_fn(request_id_layer))
}

async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
