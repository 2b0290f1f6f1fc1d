//! HTTP request handlers for the Chatbridge API

use crate::config::Config;
use crate::error::AppResult;
use crate::metrics::Metrics;
use crate::upstream::RelayClient;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub mod chat;
pub mod extractor;
pub mod health;
pub mod metrics;

/// Application state shared across all handlers
///
/// Contains configuration, the upstream relay client, and the metrics
/// registry. All fields are Arc'd for cheap cloning across Axum handlers
/// and are read-only after startup; request handling shares no mutable
/// state.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    relay: Arc<RelayClient>,
    metrics: Arc<Metrics>,
}

impl AppState {
    /// Create a new AppState from configuration
    pub fn new(config: Arc<Config>) -> AppResult<Self> {
        let relay = Arc::new(RelayClient::new(config.clone())?);
        let metrics = Arc::new(Metrics::new().map_err(|e| {
            crate::error::AppError::Internal(format!("Failed to register metrics: {}", e))
        })?);

        Ok(Self {
            config,
            relay,
            metrics,
        })
    }

    /// Get reference to the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get reference to the relay client
    pub fn relay(&self) -> &RelayClient {
        &self.relay
    }

    /// Get reference to the metrics registry
    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }
}

/// Build the application router
///
/// Wires all routes and the shared middleware stack: request IDs, HTTP
/// tracing, and a permissive CORS policy (the relay performs no caller
/// identity enforcement; any origin may call it).
pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat::handler))
        .route("/health", get(health::handler))
        .route("/metrics", get(metrics::handler))
        .layer(axum::middleware::from_fn(
            crate::middleware::request_id_middleware,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
