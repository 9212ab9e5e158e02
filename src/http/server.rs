//! HTTP server startup logic.

use std::future::Future;
use std::net::SocketAddr;

use axum::Router;
use tokio::net::TcpListener;

use crate::config::HttpServerConfig;

use super::shutdown;

/// Server startup error
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("Invalid http.host or http.port: {0}")]
    Address(String),

    #[error("Failed to bind server to {addr}: {source}")]
    Bind {
        addr: SocketAddr,
        #[source]
        source: std::io::Error,
    },

    #[error("Server error: {0}")]
    Serve(#[from] std::io::Error),
}

/// A bound listener paired with the router it dispatches to.
///
/// The listening socket is owned here for the lifetime of the process.
pub struct Server {
    listener: TcpListener,
    app: Router,
}

impl Server {
    /// Bind the configured address.
    ///
    /// Fails with [`ServerError::Bind`] when the port is in use or the process
    /// lacks the privileges to bind it. No retry is attempted.
    pub async fn bind(app: Router, config: &HttpServerConfig) -> Result<Self, ServerError> {
        let addr = resolve_addr(config).await?;

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| ServerError::Bind { addr, source })?;

        tracing::debug!(%addr, "Bound listener");
        Ok(Self { listener, app })
    }

    /// Address actually bound. Differs from the configured one when port 0 is requested.
    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Serve until SIGINT or SIGTERM, then drain in-flight requests.
    pub async fn serve(self) -> Result<(), ServerError> {
        self.serve_with_shutdown(shutdown::shutdown_signal()).await
    }

    /// Serve until `signal` resolves, then drain in-flight requests.
    pub async fn serve_with_shutdown<F>(self, signal: F) -> Result<(), ServerError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.local_addr()?;
        tracing::info!(%addr, "Server is running on port {}", addr.port());

        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(signal)
            .await?;

        tracing::info!(%addr, "Server stopped");
        Ok(())
    }
}

async fn resolve_addr(config: &HttpServerConfig) -> Result<SocketAddr, ServerError> {
    let target = format!("{}:{}", config.host, config.port);
    tokio::net::lookup_host((config.host.as_str(), config.port))
        .await
        .map_err(|e| ServerError::Address(format!("{} ({})", target, e)))?
        .next()
        .ok_or_else(|| ServerError::Address(format!("{} resolved to no address", target)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::create_router;
    use serde_json::Value;
    use tokio::sync::oneshot;

    fn loopback(port: u16) -> HttpServerConfig {
        HttpServerConfig {
            host: "127.0.0.1".to_string(),
            port,
        }
    }

    #[tokio::test]
    async fn binds_ephemeral_port_and_serves_payload() {
        let server = Server::bind(create_router(), &loopback(0)).await.unwrap();
        let addr = server.local_addr().unwrap();
        assert_ne!(addr.port(), 0);

        let (stop_tx, stop_rx) = oneshot::channel::<()>();
        let handle = tokio::spawn(server.serve_with_shutdown(async {
            let _ = stop_rx.await;
        }));

        let response = reqwest::get(format!("http://{}/", addr)).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);
        let payload: Value = response.json().await.unwrap();
        assert_eq!(payload["msg"], "server is running on v1");

        stop_tx.send(()).unwrap();
        handle.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn second_bind_on_same_port_fails() {
        let first = Server::bind(create_router(), &loopback(0)).await.unwrap();
        let port = first.local_addr().unwrap().port();

        let err = match Server::bind(create_router(), &loopback(port)).await {
            Ok(_) => panic!("second bind on port {port} should fail"),
            Err(e) => e,
        };
        match err {
            ServerError::Bind { addr, source } => {
                assert_eq!(addr.port(), port);
                assert_eq!(source.kind(), std::io::ErrorKind::AddrInUse);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn resolves_hostnames() {
        let server = Server::bind(
            create_router(),
            &HttpServerConfig {
                host: "localhost".to_string(),
                port: 0,
            },
        )
        .await
        .unwrap();
        assert!(server.local_addr().unwrap().ip().is_loopback());
    }

    #[tokio::test]
    async fn unparseable_host_is_an_address_error() {
        let result = Server::bind(
            create_router(),
            &HttpServerConfig {
                host: "not a host name".to_string(),
                port: 0,
            },
        )
        .await;
        assert!(matches!(result, Err(ServerError::Address(_))));
    }
}
