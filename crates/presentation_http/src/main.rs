//! Lyriko HTTP Server
//!
//! Main entry point for the HTTP API server.

use std::{future::IntoFuture, sync::Arc, time::Duration};

use axum::http::{HeaderValue, Method, header};
use infrastructure::{AppConfig, AsyncDatabase, AsyncDatabaseConfig, LoggingConfig, init_logging};
use presentation_http::{
    AppState, RequestIdLayer, ShutdownOutcome, routes, run_until_shutdown,
    set_expose_internal_errors, shutdown_signal, tasks::spawn_session_cleanup_task,
};
use tokio::{net::TcpListener, sync::Notify};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = AppConfig::load();
    let (config, load_error) = match config {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    init_logging(&LoggingConfig::from(&config))?;
    if let Some(e) = load_error {
        warn!("Failed to load config, using defaults: {}", e);
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %config.environment,
        "Lyriko starting"
    );

    set_expose_internal_errors(config.server.expose_internal_errors);

    // Open the database
    let database = AsyncDatabase::new(&AsyncDatabaseConfig::from(&config.database)).await?;
    if config.database.run_migrations {
        database.migrate().await?;
    }

    let addr = config.server.bind_address();
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));
    let cors_layer = cors_layer(&config);

    let state = AppState::from_database(&database, config);
    let cleanup = spawn_session_cleanup_task(state.auth.clone(), None);

    // Add middleware (order matters: last added = outermost)
    let app = routes::create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .layer(RequestIdLayer::new());

    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{}", addr);
    info!("API docs: http://{}/doc", addr);

    let drain = Arc::new(Notify::new());
    let serve = axum::serve(listener, app).with_graceful_shutdown({
        let drain = Arc::clone(&drain);
        async move { drain.notified().await }
    });

    let outcome =
        run_until_shutdown(serve.into_future(), &drain, shutdown_signal(), shutdown_timeout)
            .await?;

    cleanup.abort();
    database.close().await;

    if outcome == ShutdownOutcome::TimedOut {
        warn!("Server shutdown forced after timeout");
    } else {
        info!("Server shutdown complete");
    }

    Ok(())
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if !config.server.cors_enabled {
        return CorsLayer::new();
    }

    if config.server.allowed_origins.is_empty() {
        // Development mode: allow all origins
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        let origins: Vec<HeaderValue> = config
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
            .allow_credentials(true)
    }
}
