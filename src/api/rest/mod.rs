//! # REST API
//!
//! REST and WebSocket endpoints using axum over the
//! [`UpdateScheduler`](crate::application::scheduler::UpdateScheduler).
//!
//! # Endpoints
//!
//! ## Views
//! - `GET /api/v1/views/{view}` - Latest snapshot, 503 until first refresh
//! - `POST /api/v1/views/{view}/refresh` - Refresh one view now
//! - `POST /api/v1/refresh` - Refresh every view now
//!
//! ## Market Makers
//! - `GET /api/v1/market-makers` - Rated roster
//! - `GET /api/v1/market-makers/{name}` - One maker, case-insensitive
//! - `GET /api/v1/market-makers/{name}/pillars` - Pillar breakdown
//!
//! ## Alerts
//! - `GET /api/v1/alerts` - All alerts
//! - `GET /api/v1/alerts/active` - Active alerts
//! - `GET /api/v1/alerts/stats` - Statistics
//! - `GET /api/v1/alerts/level/{level}` - Alerts of one level
//! - `POST /api/v1/alerts` - Create a manual alert
//! - `PUT /api/v1/alerts/{id}/resolve` - Resolve an alert
//!
//! ## Scheduler
//! - `GET /api/v1/scheduler` - Status
//! - `POST /api/v1/scheduler/start` - Arm every view timer
//! - `POST /api/v1/scheduler/stop` - Cancel every view timer
//!
//! ## Stream
//! - `GET /api/v1/ws` - Current snapshots on connect, then every published
//!   snapshot as a JSON text frame; send `{"views": [..]}` to narrow the stream
//!
//! ## Health
//! - `GET /api/v1/health` - Health check endpoint
//!
//! # Usage
//!
//! ```ignore
//! use mm_monitor::api::rest::{create_router, AppState};
//! use std::sync::Arc;
//!
//! let state = Arc::new(AppState::new(scheduler, BroadcastSink::default()));
//! let router = create_router(state);
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3001").await?;
//! axum::serve(listener, router).await?;
//! ```

pub mod handlers;
pub mod routes;

pub use handlers::{
    ApiError, AppState, CreateAlertRequest, ErrorResponse, HealthResponse, ResolveAlertRequest,
};
pub use routes::{API_PREFIX, create_router};
