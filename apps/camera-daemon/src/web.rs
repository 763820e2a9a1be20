//! HTTP adapter: axum routes over the camera registry.
//!
//! - `GET /` — HTML index with links per camera
//! - `GET /api/cameras` — all camera statuses as JSON
//! - `GET /api/cameras/{name}/status` — one camera's status
//! - `GET /api/cameras/{name}/snapshot` — single JPEG
//! - `GET /api/cameras/{name}/stream` — multipart MJPEG stream
//! - `POST /api/cameras/{name}/start` / `stop` — lifecycle

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use axum::body::Body;
use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Json, Response};
use axum::routing::{get, post};
use axum::Router;
use bytes::Bytes;
use camera_core::{CameraController, CameraRegistry};
use tower_http::cors::CorsLayer;
use tracing::info;

use crate::jpeg;

/// Cadence of the multipart stream, matching the capture rate.
const STREAM_INTERVAL: Duration = Duration::from_millis(33);

/// Back-off while a streamed camera has no frame yet.
const NO_FRAME_BACKOFF: Duration = Duration::from_millis(100);

struct AppState {
    registry: Arc<CameraRegistry>,
}

pub fn router(registry: Arc<CameraRegistry>) -> Router {
    let state = Arc::new(AppState { registry });
    Router::new()
        .route("/", get(index))
        .route("/api/cameras", get(list_cameras))
        .route("/api/cameras/:name/status", get(camera_status))
        .route("/api/cameras/:name/snapshot", get(snapshot))
        .route("/api/cameras/:name/stream", get(stream))
        .route("/api/cameras/:name/start", post(start_camera))
        .route("/api/cameras/:name/stop", post(stop_camera))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(registry: Arc<CameraRegistry>, bind: SocketAddr) -> Result<()> {
    let app = router(registry);
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to bind to {bind}"))?;
    info!("web server listening on http://{bind}");
    axum::serve(listener, app).await.context("web server error")
}

fn not_found(name: &str) -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({ "error": format!("camera '{name}' not found") })),
    )
        .into_response()
}

async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let mut links = String::new();
    let mut names: Vec<_> = state.registry.list().map(|(name, _)| name).collect();
    names.sort_unstable();
    for name in names {
        links.push_str(&format!(
            "<li><a href=\"/api/cameras/{name}/stream\">Stream: {name}</a> | \
             <a href=\"/api/cameras/{name}/snapshot\">Snapshot: {name}</a></li>"
        ));
    }
    Html(format!(
        "<html><head><title>Camera API</title></head><body>\
         <h1>Camera API</h1><h2>Available cameras:</h2><ul>{links}</ul>\
         <p><a href=\"/api/cameras\">View all camera details (JSON)</a></p>\
         </body></html>"
    ))
}

async fn list_cameras(State(state): State<Arc<AppState>>) -> Response {
    Json(state.registry.statuses()).into_response()
}

async fn camera_status(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    match state.registry.get(&name) {
        Some(camera) => Json(camera.status()).into_response(),
        None => not_found(&name),
    }
}

async fn snapshot(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> Response {
    let Some(camera) = state.registry.get(&name) else {
        return not_found(&name);
    };
    match camera.current_frame().map(|frame| jpeg::encode(&frame)) {
        Some(Ok(body)) => ([(header::CONTENT_TYPE, "image/jpeg")], body).into_response(),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(serde_json::json!({ "error": "could not capture frame" })),
        )
            .into_response(),
    }
}

async fn stream(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> Response {
    let Some(camera) = state.registry.get(&name) else {
        return not_found(&name);
    };
    let parts = futures_util::stream::unfold(camera, |camera| async move {
        let body = loop {
            match camera.current_frame().map(|frame| jpeg::encode(&frame)) {
                Some(Ok(body)) => break body,
                // No frame yet (or a bad one): keep polling rather than spin
                _ => tokio::time::sleep(NO_FRAME_BACKOFF).await,
            }
        };
        tokio::time::sleep(STREAM_INTERVAL).await;
        Some((Ok::<_, Infallible>(multipart_chunk(&body)), camera))
    });
    (
        [(
            header::CONTENT_TYPE,
            "multipart/x-mixed-replace; boundary=frame",
        )],
        Body::from_stream(parts),
    )
        .into_response()
}

fn multipart_chunk(body: &[u8]) -> Bytes {
    let mut chunk = Vec::with_capacity(body.len() + 64);
    chunk.extend_from_slice(b"--frame\r\nContent-Type: image/jpeg\r\n\r\n");
    chunk.extend_from_slice(body);
    chunk.extend_from_slice(b"\r\n");
    Bytes::from(chunk)
}

async fn start_camera(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> Response {
    with_camera(&state, &name, "started", CameraController::start)
}

async fn stop_camera(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> Response {
    with_camera(&state, &name, "stopped", CameraController::stop)
}

fn with_camera(
    state: &AppState,
    name: &str,
    action: &str,
    apply: impl Fn(&CameraController),
) -> Response {
    match state.registry.get(name) {
        Some(camera) => {
            apply(&camera);
            Json(serde_json::json!({ "status": action, "camera": camera.status() }))
                .into_response()
        }
        None => not_found(name),
    }
}
