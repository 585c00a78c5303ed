//! EstateHub - Real-estate listings marketplace API

use anyhow::{Context, Result};
use axum::http::{HeaderValue, Method, header};
use clap::Parser;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

mod config;

use config::{Config, LogFormat, LoggingConfig};
use estatehub_api::{AppState, create_router};
use estatehub_auth::JwtManager;
use estatehub_db::Database;

/// EstateHub - Real-estate listings marketplace API
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config/default.toml")]
    config: String,

    /// Bind address
    #[arg(long, env = "ESTATEHUB_BIND")]
    bind: Option<String>,

    /// Port
    #[arg(short, long, env = "ESTATEHUB_PORT")]
    port: Option<u16>,

    /// Token signing secret
    #[arg(long, env = "ESTATEHUB_JWT_SECRET", hide_env_values = true)]
    jwt_secret: Option<String>,

    /// SQLite database file
    #[arg(long, env = "ESTATEHUB_DATABASE")]
    database: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = Config::load(&args.config)?;
    if let Some(secret) = args.jwt_secret {
        config.auth.jwt_secret = secret;
    }
    if let Some(database) = args.database {
        config.database.path = database;
    }

    init_logging(&config.logging);
    config.validate()?;

    info!("Starting EstateHub v{}", env!("CARGO_PKG_VERSION"));

    let metrics_handle = PrometheusBuilder::new()
        .install_recorder()
        .context("Failed to install metrics recorder")?;

    // Create the database directory
    if let Some(parent) = Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    let db_url = format!("sqlite:{}?mode=rwc", config.database.path);
    let db = Database::new(&db_url).await?;

    let token_ttl = chrono::Duration::try_seconds(config.auth.token_ttl_secs)
        .context("auth.token_ttl_secs is out of range")?;
    let jwt = Arc::new(JwtManager::new(&config.auth.jwt_secret, token_ttl));

    let state = AppState::new(db, jwt, config.auth.cookie_secure);

    let mut app = create_router(state, Some(Arc::new(metrics_handle)));
    if !config.server.cors_origins.is_empty() {
        app = app.layer(cors_layer(&config.server.cors_origins)?);
    }
    let app = app.layer(TraceLayer::new_for_http());

    let bind_addr = args.bind.unwrap_or(config.server.bind_address);
    let port = args.port.unwrap_or(config.server.port);
    let addr: SocketAddr = format!("{}:{}", bind_addr, port).parse()?;

    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

/// Initialize logging; `RUST_LOG` overrides the configured level
fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Json => registry.with(fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(fmt::layer()).init(),
    }
}

/// CORS for the configured browser origins; credentials are allowed so the
/// session cookie travels
fn cors_layer(origins: &[String]) -> Result<CorsLayer> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true))
}

/// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
