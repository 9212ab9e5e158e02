//! Request ID middleware for correlating logs with requests.
//!
//! Generates a UUID v4 for each incoming request and creates a tracing span
//! that wraps the entire request lifecycle. The same ID is returned to the
//! client in the `x-request-id` response header.

use std::time::Instant;

use axum::{
    extract::Request,
    http::HeaderValue,
    middleware::Next,
    response::Response,
};
use tracing::Instrument;
use uuid::Uuid;

pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Extension type for accessing the request ID in handlers.
#[derive(Clone, Copy, Debug)]
pub struct RequestId(pub Uuid);

/// Middleware that generates a request ID and creates a request span.
///
/// Must be the outermost layer so the span covers routing and the fallback.
pub async fn request_id_layer(mut request: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4();

    let span = tracing::info_span!(
        "request",
        request_id = %request_id,
        method = %request.method(),
        path = %request.uri().path(),
        duration_ms = tracing::field::Empty,
    );

    request.extensions_mut().insert(RequestId(request_id));
    let start = Instant::now();

    async move {
        let mut response = next.run(request).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        tracing::Span::current().record("duration_ms", duration_ms);
        tracing::info!(
            status = response.status().as_u16(),
            duration_ms,
            "Request completed"
        );

        // A hyphenated UUID is always a valid header value
        if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
            response.headers_mut().insert(REQUEST_ID_HEADER, value);
        }

        response
    }
    .instrument(span)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::{middleware, routing::get, Extension, Router};
    use tower::ServiceExt;

    async fn echo_request_id(Extension(RequestId(id)): Extension<RequestId>) -> String {
        id.to_string()
    }

    #[tokio::test]
    async fn handlers_see_the_id_returned_in_the_header() {
        let app = Router::new()
            .route("/id", get(echo_request_id))
            .layer(middleware::from_fn(request_id_layer));

        let request = axum::http::Request::builder()
            .uri("/id")
            .body(Body::empty())
            .expect("expected request to build");
        let response = app.oneshot(request).await.unwrap();

        let header = response.headers()[REQUEST_ID_HEADER]
            .to_str()
            .unwrap()
            .to_string();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        assert_eq!(std::str::from_utf8(&body).unwrap(), header);
        assert!(Uuid::parse_str(&header).is_ok());
    }

    #[tokio::test]
    async fn each_request_gets_a_fresh_id() {
        let app = Router::new()
            .route("/id", get(echo_request_id))
            .layer(middleware::from_fn(request_id_layer));

        let mut ids = Vec::new();
        for _ in 0..2 {
            let request = axum::http::Request::builder()
                .uri("/id")
                .body(Body::empty())
                .unwrap();
            let response = app.clone().oneshot(request).await.unwrap();
            ids.push(to_bytes(response.into_body(), usize::MAX).await.unwrap());
        }
        assert_ne!(ids[0], ids[1]);
    }
}
