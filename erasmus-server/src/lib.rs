/// Erasmus budget short-link HTTP service
///
/// Exposes the short-URL store over HTTP: create and resolve endpoints, the
/// `/s/:id` redirect page, plus health and Prometheus endpoints.

pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;

use axum::{
    routing::{get, post},
    Router,
};
use erasmus_store::UrlStore;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub use config::ServerConfig;
pub use error::ApiError;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<UrlStore>,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: UrlStore, config: ServerConfig) -> Self {
        Self {
            store: Arc::new(store),
            config: Arc::new(config),
        }
    }
}

/// Build the router with every route
pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/api/shorturl", post(handlers::create_short_url))
        .route("/api/shorturl/", get(handlers::missing_id))
        .route("/api/shorturl/:id", get(handlers::resolve_short_url))
        .route("/s/:id", get(handlers::redirect_short_url))
        .route("/health", get(handlers::health_handler))
        .route("/ready", get(handlers::health_handler))
        .route("/metrics", get(handlers::metrics_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
