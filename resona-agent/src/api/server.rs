//! HTTP router setup
//!
//! Sets up the Axum router with control endpoints and the SSE stream.

use axum::{
    extract::State,
    response::Json,
    routing::{delete, get, post},
    Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use resona_common::events::EventBus;

use super::{handlers, sse};
use crate::equalizer::EqualizerEngine;
use crate::library::WatchManager;

/// Shared application context passed to all handlers
#[derive(Clone)]
pub struct AppContext {
    pub bus: Arc<EventBus>,
    pub watches: Arc<WatchManager>,
    pub equalizer: Arc<EqualizerEngine>,
    pub port: u16,
}

/// Create the API router
pub fn create_router(ctx: AppContext) -> Router {
    Router::new()
        // Health check (no prefix for health endpoint)
        .route("/health", get(health_check))
        // API v1 routes
        .nest(
            "/api/v1",
            Router::new()
                // Library folder watch
                .route("/library/watch", post(handlers::start_watch))
                .route("/library/watch", delete(handlers::stop_watch))
                .route("/library/watch", get(handlers::watch_status))
                .route("/library/scan", post(handlers::scan_library))
                // Equalizer
                .route("/equalizer", get(handlers::get_equalizer))
                .route("/equalizer/detect", post(handlers::detect_equalizer))
                .route("/equalizer/enabled", post(handlers::set_enabled))
                .route("/equalizer/band", post(handlers::set_band_gain))
                .route("/equalizer/gains", post(handlers::set_gains))
                .route("/equalizer/preset", post(handlers::apply_preset))
                .route("/equalizer/presets", get(handlers::list_presets))
                // SSE events
                .route("/events", get(sse::event_stream)),
        )
        .with_state(ctx)
        .layer(TraceLayer::new_for_http())
        // Enable CORS for local access
        .layer(CorsLayer::permissive())
}

/// Health check endpoint
async fn health_check(State(ctx): State<AppContext>) -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "module": "resona-agent",
        "version": env!("CARGO_PKG_VERSION"),
        "port": ctx.port,
    }))
}
