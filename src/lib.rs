//! pulse: a minimal liveness HTTP server.
//!
//! Serves `GET /` with a constant JSON payload on a port taken from the
//! environment. The binary in `main.rs` wires these modules together.

pub mod config;
pub mod error;
pub mod http;
pub mod middleware;
pub mod routes;
