//! HTTP + WebSocket API for the attention synthesizer
//!
//! Endpoints:
//! - GET /health - Health check
//! - GET /state - Controller status
//! - POST /perception - Replace the perception snapshot
//! - POST /config - Apply a configuration snapshot
//! - POST /api/eyecontact - Set EyeContact
//! - POST /api/lookat - Set LookAt (with face id / region code)
//! - POST /api/mirroring - Set Mirroring
//! - POST /api/gaze - Set GazeCoordination
//! - WS /ws - Live command stream

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use futures_util::{SinkExt, StreamExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::broadcast;
use tracing::{debug, warn};

use crate::core::service::AttentionService;
use crate::types::{
    AttentionConfig, AttentionError, Command, ControllerStatus, EyeContact, GazeCoordination, LookAt,
    Mirroring, ModeSnapshot, PerceptionState,
};

/// App state
pub struct AppState {
    pub service: Arc<AttentionService>,
}

/// Mode request body; `mode` is a name or a numeric code
#[derive(Debug, Deserialize)]
pub struct ModeRequest {
    pub mode: String,
}

/// LookAt request body
#[derive(Debug, Deserialize)]
pub struct LookAtRequest {
    pub mode: String,
    /// Face id for one_face, region code for region
    #[serde(default)]
    pub id: u32,
}

/// Health response
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub ticking: bool,
}

/// Perception ingestion response
#[derive(Debug, Serialize)]
pub struct PerceptionResponse {
    pub faces: usize,
    pub salient_points: usize,
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

fn bad_request(e: AttentionError) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse { error: e.to_string() }),
    )
}

/// Create the API router
pub fn create_router(service: Arc<AttentionService>) -> Router {
    let state = Arc::new(AppState { service });

    Router::new()
        .route("/health", get(health))
        .route("/state", get(get_state))
        .route("/perception", post(post_perception))
        .route("/config", post(post_config))
        .route("/api/eyecontact", post(set_eye_contact))
        .route("/api/lookat", post(set_look_at))
        .route("/api/mirroring", post(set_mirroring))
        .route("/api/gaze", post(set_gaze))
        .route("/ws", get(websocket_handler))
        .with_state(state)
}

/// Health check endpoint
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
        ticking: state.service.is_ticking().await,
    })
}

async fn get_state(State(state): State<Arc<AppState>>) -> Json<ControllerStatus> {
    Json(state.service.status().await)
}

async fn post_perception(
    State(state): State<Arc<AppState>>,
    Json(perception): Json<PerceptionState>,
) -> Json<PerceptionResponse> {
    let response = PerceptionResponse {
        faces: perception.faces.len(),
        salient_points: perception.salient_points.len(),
    };
    state.service.update_perception(perception).await;
    Json(response)
}

async fn post_config(
    State(state): State<Arc<AppState>>,
    Json(config): Json<AttentionConfig>,
) -> Result<Json<ModeSnapshot>, ApiError> {
    state.service.update_config(config).await.map(Json).map_err(bad_request)
}

async fn set_eye_contact(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ModeRequest>,
) -> Result<Json<ModeSnapshot>, ApiError> {
    let mode: EyeContact = req.mode.parse().map_err(bad_request)?;
    Ok(Json(state.service.request_eye_contact(mode).await))
}

async fn set_look_at(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LookAtRequest>,
) -> Result<Json<ModeSnapshot>, ApiError> {
    let mode: LookAt = req.mode.parse().map_err(bad_request)?;
    state
        .service
        .request_look_at(mode, req.id)
        .await
        .map(Json)
        .map_err(bad_request)
}

async fn set_mirroring(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ModeRequest>,
) -> Result<Json<ModeSnapshot>, ApiError> {
    let mode: Mirroring = req.mode.parse().map_err(bad_request)?;
    Ok(Json(state.service.request_mirroring(mode).await))
}

async fn set_gaze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ModeRequest>,
) -> Result<Json<ModeSnapshot>, ApiError> {
    let mode: GazeCoordination = req.mode.parse().map_err(bad_request)?;
    Ok(Json(state.service.request_gaze(mode).await))
}

/// WebSocket handler for the live command stream
async fn websocket_handler(State(state): State<Arc<AppState>>, ws: WebSocketUpgrade) -> impl IntoResponse {
    let rx = state.service.subscribe();
    ws.on_upgrade(move |socket| handle_websocket(socket, rx))
}

/// Forward commands until either side goes away
async fn handle_websocket(socket: WebSocket, mut rx: broadcast::Receiver<Command>) {
    let (mut sender, mut receiver) = socket.split();

    let mut send_task = tokio::spawn(async move {
        loop {
            match rx.recv().await {
                Ok(command) => {
                    let json = match serde_json::to_string(&command) {
                        Ok(json) => json,
                        Err(e) => {
                            warn!("command not serializable: {}", e);
                            continue;
                        }
                    };
                    if sender.send(Message::Text(json)).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    warn!("websocket client lagged, {} commands dropped", n);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut recv_task = tokio::spawn(async move {
        while let Some(Ok(message)) = receiver.next().await {
            if matches!(message, Message::Close(_)) {
                break;
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }
    debug!("websocket client disconnected");
}

/// Run the API server
pub async fn run_server(addr: &str, service: Arc<AttentionService>) -> Result<(), Box<dyn std::error::Error>> {
    let router = create_router(service);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("attention synthesizer API running on {}", addr);
    println!("  GET  /health          - Health check");
    println!("  GET  /state           - Controller status");
    println!("  POST /perception      - Perception snapshot");
    println!("  POST /config          - Configuration snapshot");
    println!("  POST /api/eyecontact  - Set eye contact");
    println!("  POST /api/lookat      - Set look-at");
    println!("  POST /api/mirroring   - Set mirroring");
    println!("  POST /api/gaze        - Set gaze coordination");
    println!("  WS   /ws              - Live commands");
    axum::serve(listener, router).await?;
    Ok(())
}
