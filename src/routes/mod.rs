pub mod api_routes;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::ServerConfig;
use crate::service::chat_service::ChatService;
use api_routes::{chat_handler, health_handler, list_messages_handler};

/// Builds the backend router with tracing and CORS applied.
pub fn router(svc: ChatService, config: &ServerConfig) -> Router {
    Router::new()
        .route("/api/v1/chat", post(chat_handler))
        .route("/api/v1/conversations/{id}/messages", get(list_messages_handler))
        .route("/api/v1/health", get(health_handler))
        .layer(cors_layer(config))
        .layer(TraceLayer::new_for_http())
        .with_state(svc)
}

/// The browser widget is served from another origin, so the API must answer
/// CORS preflights.
fn cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .cors_origins
        .iter()
        .flatten()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new().allow_headers(Any).allow_methods(Any);
    if origins.is_empty() {
        // Wildcard for development; set SHAYLI_CORS_ORIGINS in production.
        cors.allow_origin(Any)
    } else {
        cors.allow_origin(origins)
    }
}
