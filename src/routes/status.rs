//! Liveness endpoint served at the root path.
//!
//! The payload is constant: the handler reads nothing from the request and
//! performs no I/O, so it cannot fail.

use axum::Json;
use serde::Serialize;

/// Message reported while the process is accepting requests
pub const STATUS_MESSAGE: &str = "server is running on v1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusPayload {
    pub msg: &'static str,
}

impl StatusPayload {
    pub const fn running() -> Self {
        Self {
            msg: STATUS_MESSAGE,
        }
    }
}

/// Root handler. Query string, headers and body are ignored.
pub async fn index() -> Json<StatusPayload> {
    Json(StatusPayload::running())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payload_serializes_to_single_msg_key() {
        let body = serde_json::to_string(&StatusPayload::running()).unwrap();
        assert_eq!(body, r#"{"msg":"server is running on v1"}"#);
    }
}
