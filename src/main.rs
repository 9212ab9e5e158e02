//! pulse: a minimal liveness HTTP server.
//!
//! This is the application entry point. It loads `.env`, parses the command
//! line, resolves configuration, initializes tracing, binds the listener and
//! serves the router until shutdown.

use std::path::PathBuf;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pulse::config::{AppConfig, LogFormat, DEFAULT_LOG_FILTER};
use pulse::http::Server;
use pulse::routes::create_router;

/// pulse: answers GET / with a liveness payload
#[derive(Parser, Debug)]
#[command(name = "pulse", version, about)]
struct Args {
    /// Path to an optional configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Port to listen on (overrides PORT and the configuration file)
    #[arg(short, long)]
    port: Option<u16>,

    /// Log level filter (e.g., "pulse=debug,tower_http=info")
    #[arg(short, long)]
    log_level: Option<String>,
}

fn init_tracing(filter: &str, format: LogFormat) {
    let registry = tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::new(filter));

    match format {
        LogFormat::Text => registry.with(tracing_subscriber::fmt::layer()).init(),
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json().with_current_span(true))
            .init(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env locally; variables already in the environment take precedence.
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    // Initialize tracing with priority: CLI > env > default
    let log_filter = args
        .log_level
        .clone()
        .or_else(|| std::env::var("RUST_LOG").ok())
        .unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string());

    let config = match AppConfig::resolve(args.config.as_deref(), args.port) {
        Ok(config) => config,
        Err(e) => {
            // The configured format is unknown here, so report in the default one
            init_tracing(&log_filter, LogFormat::default());
            tracing::error!(error = %e, "Failed to load configuration");
            return Err(e.into());
        }
    };
    init_tracing(&log_filter, config.logging.format);

    tracing::info!(
        host = %config.http.host,
        port = config.http.port,
        format = ?config.logging.format,
        "Loaded configuration"
    );

    let server = match Server::bind(create_router(), &config.http).await {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Failed to start server");
            return Err(e.into());
        }
    };

    if let Err(e) = server.serve().await {
        tracing::error!(error = %e, "Server error");
        return Err(e.into());
    }

    Ok(())
}
