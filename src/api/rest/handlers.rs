//! # REST Handlers
//!
//! Request handlers for the REST API endpoints.
//!
//! Handlers are thin: they parse path and body input, call the
//! [`UpdateScheduler`] and map [`ApplicationError`] onto HTTP status codes.
//!
//! | Error | Status |
//! |-------|--------|
//! | not found | 404 |
//! | validation / domain rule | 400 |
//! | view unavailable | 503 |
//! | internal | 500 |

use crate::application::alert_book::AlertStats;
use crate::application::error::ApplicationError;
use crate::application::scheduler::{SchedulerStatus, UpdateScheduler};
use crate::application::views::builders::PillarDetail;
use crate::application::views::{SnapshotState, ViewKind, ViewSnapshot};
use crate::domain::entities::alert::Alert;
use crate::domain::entities::market_maker::RatedMarketMaker;
use crate::domain::value_objects::enums::AlertLevel;
use crate::domain::value_objects::ids::AlertId;
use crate::domain::value_objects::timestamp::Timestamp;
use crate::infrastructure::broadcast_sink::BroadcastSink;
use axum::Json;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;

// ============================================================================
// State
// ============================================================================

/// Shared state of every handler.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The scheduler owning every view.
    pub scheduler: UpdateScheduler,
    /// Snapshot fan-out for WebSocket clients.
    pub sink: BroadcastSink,
}

impl AppState {
    /// Creates the state and attaches the sink to the scheduler.
    #[must_use]
    pub fn new(scheduler: UpdateScheduler, sink: BroadcastSink) -> Self {
        sink.attach(&scheduler);
        Self { scheduler, sink }
    }
}

// ============================================================================
// Request / Response Types
// ============================================================================

/// Error body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Machine-readable code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
}

/// Health body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always "healthy" when the process answers.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Server time.
    pub timestamp: Timestamp,
    /// Whether timers are armed.
    pub scheduler_running: bool,
    /// Whether the data source is failing.
    pub degraded: bool,
}

/// Body of `POST /alerts`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAlertRequest {
    /// Alert level, generic levels only.
    pub level: String,
    /// Message.
    pub message: String,
    /// Optional maker binding.
    #[serde(default)]
    pub market_maker: Option<String>,
}

/// Body of `PUT /alerts/{id}/resolve`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolveAlertRequest {
    /// Resolution reason.
    pub reason: String,
}

// ============================================================================
// Error Mapping
// ============================================================================

/// [`ApplicationError`] rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(ApplicationError);

impl From<ApplicationError> for ApiError {
    fn from(err: ApplicationError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = match &self.0 {
            ApplicationError::NotFound { .. } => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            ApplicationError::Validation(_) | ApplicationError::Domain(_) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR")
            }
            ApplicationError::ViewUnavailable(_) => {
                (StatusCode::SERVICE_UNAVAILABLE, "VIEW_UNAVAILABLE")
            }
            ApplicationError::Internal(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
            }
        };
        if status.is_server_error() {
            tracing::warn!(error = %self.0, status = status.as_u16(), "request failed");
        }
        let body = ErrorResponse {
            error: code.to_string(),
            message: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

type ApiResult<T> = Result<T, ApiError>;

fn parse_view(raw: &str) -> ApiResult<ViewKind> {
    raw.parse::<ViewKind>()
        .map_err(|e| ApplicationError::validation(e.to_string()).into())
}

fn parse_level(raw: &str) -> ApiResult<AlertLevel> {
    raw.parse::<AlertLevel>()
        .map_err(|e| ApplicationError::validation(e.to_string()).into())
}

fn parse_alert_id(raw: &str) -> ApiResult<AlertId> {
    raw.parse::<AlertId>()
        .map_err(|e| ApplicationError::validation(format!("invalid alert id: {e}")).into())
}

// ============================================================================
// Health
// ============================================================================

/// `GET /health`
pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Timestamp::now(),
        scheduler_running: state.scheduler.is_running(),
        degraded: state.scheduler.is_degraded(),
    })
}

// ============================================================================
// Views
// ============================================================================

/// `GET /views/{view}`
pub async fn get_view(
    State(state): State<Arc<AppState>>,
    Path(view): Path<String>,
) -> ApiResult<Json<ViewSnapshot>> {
    let view = parse_view(&view)?;
    match state.scheduler.get_snapshot(view) {
        SnapshotState::Available(snapshot) => Ok(Json(snapshot.as_ref().clone())),
        SnapshotState::Unavailable => Err(ApplicationError::view_unavailable(view).into()),
    }
}

/// `POST /views/{view}/refresh`
pub async fn refresh_view(
    State(state): State<Arc<AppState>>,
    Path(view): Path<String>,
) -> ApiResult<Json<ViewSnapshot>> {
    let view = parse_view(&view)?;
    let snapshot = state.scheduler.refresh_now(view).await?;
    Ok(Json(snapshot.as_ref().clone()))
}

/// `POST /refresh`
pub async fn refresh_all(State(state): State<Arc<AppState>>) -> ApiResult<Json<Vec<ViewSnapshot>>> {
    let snapshots = state.scheduler.refresh_all().await?;
    Ok(Json(snapshots.iter().map(|s| s.as_ref().clone()).collect()))
}

// ============================================================================
// Market Makers
// ============================================================================

/// `GET /market-makers`
pub async fn list_market_makers(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<RatedMarketMaker>>> {
    Ok(Json(state.scheduler.market_makers()?))
}

/// `GET /market-makers/{name}`
pub async fn get_market_maker(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<RatedMarketMaker>> {
    Ok(Json(state.scheduler.market_maker(&name)?))
}

/// `GET /market-makers/{name}/pillars`
pub async fn get_pillars(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult<Json<PillarDetail>> {
    Ok(Json(state.scheduler.pillar_detail_for(&name)?))
}

// ============================================================================
// Alerts
// ============================================================================

/// `GET /alerts`
pub async fn list_alerts(State(state): State<Arc<AppState>>) -> Json<Vec<Alert>> {
    Json(state.scheduler.alerts())
}

/// `GET /alerts/active`
pub async fn active_alerts(State(state): State<Arc<AppState>>) -> Json<Vec<Alert>> {
    Json(state.scheduler.active_alerts())
}

/// `GET /alerts/stats`
pub async fn alert_stats(State(state): State<Arc<AppState>>) -> Json<AlertStats> {
    Json(state.scheduler.alert_stats())
}

/// `GET /alerts/level/{level}`
pub async fn alerts_by_level(
    State(state): State<Arc<AppState>>,
    Path(level): Path<String>,
) -> ApiResult<Json<Vec<Alert>>> {
    let level = parse_level(&level)?;
    Ok(Json(state.scheduler.alerts_by_level(level)))
}

/// `POST /alerts`
pub async fn create_alert(
    State(state): State<Arc<AppState>>,
    Json(request): Json<CreateAlertRequest>,
) -> ApiResult<(StatusCode, Json<Alert>)> {
    let level = parse_level(&request.level)?;
    let alert = state.scheduler.create_alert(
        level,
        &request.message,
        request.market_maker.as_deref(),
    )?;
    Ok((StatusCode::CREATED, Json(alert)))
}

/// `PUT /alerts/{id}/resolve`
pub async fn resolve_alert(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    Json(request): Json<ResolveAlertRequest>,
) -> ApiResult<Json<Alert>> {
    let id = parse_alert_id(&id)?;
    Ok(Json(state.scheduler.resolve_alert(id, &request.reason)?))
}

// ============================================================================
// Scheduler
// ============================================================================

/// `GET /scheduler`
pub async fn scheduler_status(State(state): State<Arc<AppState>>) -> Json<SchedulerStatus> {
    Json(state.scheduler.status())
}

/// `POST /scheduler/start`
pub async fn start_scheduler(State(state): State<Arc<AppState>>) -> Json<SchedulerStatus> {
    state.scheduler.start().await;
    Json(state.scheduler.status())
}

/// `POST /scheduler/stop`
pub async fn stop_scheduler(State(state): State<Arc<AppState>>) -> Json<SchedulerStatus> {
    state.scheduler.stop();
    Json(state.scheduler.status())
}

// ============================================================================
// WebSocket
// ============================================================================

/// `GET /ws`
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| stream_snapshots(socket, state))
}

/// Text frame a WebSocket client sends to pick the views it receives.
///
/// The reply is the current snapshot of every listed view, after which only
/// those views are streamed.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamRequest {
    /// View names, as accepted by `GET /views/{view}`.
    pub views: Vec<String>,
}

impl StreamRequest {
    /// Parses the listed views. An empty list selects every view.
    fn selection(&self) -> ApiResult<Vec<ViewKind>> {
        if self.views.is_empty() {
            return Ok(ViewKind::ALL.to_vec());
        }
        self.views.iter().map(|raw| parse_view(raw)).collect()
    }
}

fn snapshot_frame(snapshot: &ViewSnapshot) -> Option<String> {
    serde_json::to_string(snapshot)
        .inspect_err(|e| {
            tracing::warn!(view = %snapshot.view(), error = %e, "snapshot serialization failed");
        })
        .ok()
}

/// Frames for the current snapshot of each of `views` that has one.
fn current_frames(scheduler: &UpdateScheduler, views: &[ViewKind]) -> Vec<String> {
    views
        .iter()
        .filter_map(|view| match scheduler.get_snapshot(*view) {
            SnapshotState::Available(snapshot) => snapshot_frame(&snapshot),
            SnapshotState::Unavailable => None,
        })
        .collect()
}

/// Handles one client text frame: a new selection and its current frames,
/// or an error frame.
fn apply_request(
    scheduler: &UpdateScheduler,
    text: &str,
) -> Result<(Vec<ViewKind>, Vec<String>), String> {
    let selection = serde_json::from_str::<StreamRequest>(text)
        .map_err(|e| ApplicationError::validation(format!("invalid stream request: {e}")))
        .and_then(|request| request.selection().map_err(|ApiError(e)| e));
    match selection {
        Ok(views) => {
            let frames = current_frames(scheduler, &views);
            Ok((views, frames))
        }
        Err(e) => {
            let body = ErrorResponse {
                error: "VALIDATION_ERROR".to_string(),
                message: e.to_string(),
            };
            Err(serde_json::to_string(&body).unwrap_or_default())
        }
    }
}

async fn stream_snapshots(socket: WebSocket, state: Arc<AppState>) {
    let mut rx = state.sink.subscribe();
    let (mut sender, mut receiver) = socket.split();
    tracing::info!(clients = state.sink.receiver_count(), "ws client connected");

    let mut selected = ViewKind::ALL.to_vec();
    for frame in current_frames(&state.scheduler, &selected) {
        if sender.send(Message::Text(frame.into())).await.is_err() {
            tracing::info!("ws client disconnected");
            return;
        }
    }

    loop {
        tokio::select! {
            result = rx.recv() => match result {
                Ok(snapshot) => {
                    if !selected.contains(&snapshot.view()) {
                        continue;
                    }
                    let Some(json) = snapshot_frame(&snapshot) else {
                        continue;
                    };
                    if sender.send(Message::Text(json.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::debug!(skipped, "ws client lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let frames = match apply_request(&state.scheduler, text.as_str()) {
                        Ok((views, frames)) => {
                            tracing::debug!(views = views.len(), "ws selection changed");
                            selected = views;
                            frames
                        }
                        Err(error) => vec![error],
                    };
                    let mut closed = false;
                    for frame in frames {
                        if sender.send(Message::Text(frame.into())).await.is_err() {
                            closed = true;
                            break;
                        }
                    }
                    if closed {
                        break;
                    }
                }
                Some(Ok(Message::Close(_)) | Err(_)) | None => break,
                Some(Ok(_)) => {}
            },
        }
    }

    tracing::info!("ws client disconnected");
}
