//! # REST Routes
//!
//! Router configuration for the REST API.

use super::handlers::{self, AppState};
use axum::Router;
use axum::routing::{get, post, put};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// API prefix.
pub const API_PREFIX: &str = "/api/v1";

/// Builds the router with every endpoint mounted under [`API_PREFIX`].
#[must_use]
pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api = Router::new()
        .route("/health", get(handlers::health))
        // Views
        .route("/views/{view}", get(handlers::get_view))
        .route("/views/{view}/refresh", post(handlers::refresh_view))
        .route("/refresh", post(handlers::refresh_all))
        // Market makers
        .route("/market-makers", get(handlers::list_market_makers))
        .route("/market-makers/{name}", get(handlers::get_market_maker))
        .route("/market-makers/{name}/pillars", get(handlers::get_pillars))
        // Alerts
        .route(
            "/alerts",
            get(handlers::list_alerts).post(handlers::create_alert),
        )
        .route("/alerts/active", get(handlers::active_alerts))
        .route("/alerts/stats", get(handlers::alert_stats))
        .route("/alerts/level/{level}", get(handlers::alerts_by_level))
        .route("/alerts/{id}/resolve", put(handlers::resolve_alert))
        // Scheduler
        .route("/scheduler", get(handlers::scheduler_status))
        .route("/scheduler/start", post(handlers::start_scheduler))
        .route("/scheduler/stop", post(handlers::stop_scheduler))
        // Stream
        .route("/ws", get(handlers::ws_handler));

    Router::new()
        .nest(API_PREFIX, api)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
