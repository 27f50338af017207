//! Fuel economy service entry point

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use axum::http::HeaderValue;
use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::SqlitePoolOptions;
use tokio::signal;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info};

use fe_common::logging::{init_logging, LogConfig};
use fe_server::api::{self, AppState};
use fe_server::config::{Config, CorsConfig};
use fe_server::ingest;
use fe_srm::{DbMap, Dialect};

#[tokio::main]
async fn main() -> Result<()> {
    let log_config = LogConfig::from_env()?.with_log_file_prefix("fe-server");
    init_logging(&log_config)?;

    info!("Starting fuel economy service");

    let config = Config::load()?;
    info!(
        "Configuration loaded - server will bind to {}:{}",
        config.server.host, config.server.port
    );

    let db = connect(&config).await?;
    info!(backend = %config.database.backend, "Database connection pool established");

    let (queue, _dispatcher) = ingest::start(config.ingest.workers);
    info!(workers = config.ingest.workers, "Ingestion workers started");

    let state = AppState {
        db,
        queue,
    };
    let app = api::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&config.cors));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down gracefully");
    Ok(())
}

/// Build the pool for the configured backend and run migrations.
///
/// Migrations are Postgres-flavored and only run there; sqlite callers
/// (tests, scratch environments) own their schema.
async fn connect(config: &Config) -> Result<DbMap> {
    let db = match Dialect::from_backend(&config.database.backend)? {
        Dialect::Postgres => {
            let pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
                .connect(&config.database.url)
                .await?;
            sqlx::migrate!("../../migrations")
                .run(&pool)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to run migrations: {}", e))?;
            info!("Database migrations completed");
            DbMap::postgres(pool)
        },
        Dialect::Sqlite => {
            let pool = SqlitePoolOptions::new()
                .max_connections(config.database.max_connections)
                .acquire_timeout(Duration::from_secs(config.database.connect_timeout_secs))
                .connect(&config.database.url)
                .await?;
            DbMap::sqlite(pool)
        },
    };
    Ok(db)
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    if config.allowed_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }
    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    CorsLayer::new().allow_origin(origins)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            error!(%err, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            },
            Err(err) => {
                error!(%err, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
