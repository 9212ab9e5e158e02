//! HTTP listener.
//!
//! Binds the configured address, reports readiness and serves the router
//! until SIGINT/SIGTERM triggers a graceful shutdown.

mod server;
mod shutdown;

pub use server::{Server, ServerError};
pub use shutdown::shutdown_signal;
