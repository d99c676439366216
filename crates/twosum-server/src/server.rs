//! Axum router and server lifecycle

use crate::{api, config::ServerConfig, error::ErrorBody, state::AppState};
use anyhow::{Context, Result};
use axum::{
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use tower_http::trace::TraceLayer;

/// Build the application router over `state`
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/two_sum", post(api::two_sum))
        .route("/api/health", get(api::health))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn not_found() -> (StatusCode, Json<ErrorBody>) {
    (
        StatusCode::NOT_FOUND,
        Json(ErrorBody {
            error: "not found".to_string(),
        }),
    )
}

/// Run the API server until a shutdown signal arrives
pub async fn run_server(config: ServerConfig) -> Result<()> {
    tracing::info!("Starting twosum server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        database = %config.database_url,
        cache = ?config.cache_backend,
        breaker_threshold = config.breaker_threshold,
        timeout = ?config.request_timeout,
        "server configuration"
    );

    let state = AppState::from_config(&config).await?;
    tracing::info!("Application state initialized");

    let app = build_router(state);

    let addr = config.address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    tracing::info!("twosum listening on http://{}", addr);
    tracing::info!("   Solve:  POST http://{}/two_sum", addr);
    tracing::info!("   Health: http://{}/api/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("twosum server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "unable to install Ctrl+C signal handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "unable to install SIGTERM handler");
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

    tracing::info!("shutdown signal received");
}
