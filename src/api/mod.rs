//! HTTP API module for Placetrack
//!
//! Provides the REST endpoints used by the tracking frontend.

pub mod routes;

use crate::config::{Config, ServerConfig};
use crate::db::Database;
use crate::error::{CoreError, Result};
use crate::handlers::CompanyHandler;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Company business logic over the shared database
    pub companies: CompanyHandler,
}

impl AppState {
    pub fn new(db: Arc<Database>) -> Self {
        AppState {
            companies: CompanyHandler::new(db),
        }
    }
}

/// Start the HTTP API server
pub async fn serve(addr: SocketAddr, db: Arc<Database>, config: &Config) -> Result<()> {
    let app = create_router(AppState::new(db), &config.server);

    // Check if port is already in use (another instance running)
    if tokio::net::TcpStream::connect(addr).await.is_ok() {
        tracing::error!(
            "Port {} is already in use; another placetrack instance may be running. \
             Use `curl http://{}/health` to check.",
            addr.port(),
            addr
        );
        return Err(CoreError::Api(format!("Port {} already in use", addr.port())));
    }

    tracing::info!("Listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| CoreError::Api(e.to_string()))?;

    Ok(())
}

/// Create the API router with all routes
pub fn create_router(state: AppState, server: &ServerConfig) -> Router {
    Router::new()
        // Health check
        .route("/health", get(routes::health))
        // Company queries
        .route("/data", get(routes::get_count))
        .route("/placement", get(routes::get_placement))
        .route("/companies", get(routes::list_companies))
        // Company mutations
        .route("/company", post(routes::create_company))
        .route(
            "/company/:id/coordinator",
            patch(routes::update_coordinator),
        )
        .route("/company/:id/status", patch(routes::update_status))
        // Coordinator stats
        .route("/coordinator-stats", get(routes::get_coordinator_stats))
        // Global middleware
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&server.allowed_origins))
        .with_state(state)
}

/// CORS restricted to the configured origins, with credentials
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!("Ignoring invalid allowed origin: {}", origin);
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .allow_credentials(true)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
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

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
