//! End-to-end tests: real HTTP server over mock cameras.

use camera_core::{CameraController, CameraRegistry, MockBackend, Source};
use camera_daemon::web;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

async fn spawn_server(names: &[&str]) -> SocketAddr {
    let mut registry = CameraRegistry::new();
    for name in names {
        registry.register(CameraController::new(
            *name,
            Source::Index(0),
            Arc::new(MockBackend),
        ));
    }
    registry.start_all();

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = web::router(Arc::new(registry));
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

/// Poll `url` every 50ms until `check` passes or two seconds elapse.
async fn wait_for_json(
    client: &reqwest::Client,
    url: &str,
    check: impl Fn(&serde_json::Value) -> bool,
) -> serde_json::Value {
    for _ in 0..40 {
        if let Ok(resp) = client.get(url).send().await {
            if let Ok(body) = resp.json::<serde_json::Value>().await {
                if check(&body) {
                    return body;
                }
            }
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    panic!("condition not reached for {url}");
}

#[tokio::test(flavor = "multi_thread")]
async fn status_becomes_connected_and_snapshot_serves_jpeg() {
    let addr = spawn_server(&["main"]).await;
    let client = reqwest::Client::new();

    let status = wait_for_json(
        &client,
        &format!("http://{addr}/api/cameras/main/status"),
        |body| body["connected"] == serde_json::Value::Bool(true),
    )
    .await;
    assert_eq!(status["running"], serde_json::Value::Bool(true));
    assert_eq!(status["name"], "main");
    assert!(status["last_frame_age"].as_f64().is_some());

    let resp = client
        .get(format!("http://{addr}/api/cameras/main/snapshot"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "image/jpeg"
    );
    let body = resp.bytes().await.unwrap();
    assert!(body.starts_with(&[0xFF, 0xD8]));
}

#[tokio::test(flavor = "multi_thread")]
async fn unknown_camera_returns_404() {
    let addr = spawn_server(&["main"]).await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("http://{addr}/api/cameras/ghost/status"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["error"], "camera 'ghost' not found");

    let resp = client
        .post(format!("http://{addr}/api/cameras/ghost/start"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
}

#[tokio::test(flavor = "multi_thread")]
async fn list_covers_all_cameras() {
    let addr = spawn_server(&["front", "back"]).await;
    let client = reqwest::Client::new();

    let body = wait_for_json(&client, &format!("http://{addr}/api/cameras"), |body| {
        body.as_object().is_some_and(|map| map.len() == 2)
    })
    .await;
    assert!(body.get("front").is_some());
    assert!(body.get("back").is_some());
}

#[tokio::test(flavor = "multi_thread")]
async fn stop_endpoint_halts_the_camera() {
    let addr = spawn_server(&["main"]).await;
    let client = reqwest::Client::new();

    wait_for_json(
        &client,
        &format!("http://{addr}/api/cameras/main/status"),
        |body| body["connected"] == serde_json::Value::Bool(true),
    )
    .await;

    let resp = client
        .post(format!("http://{addr}/api/cameras/main/stop"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "stopped");
    assert_eq!(body["camera"]["running"], serde_json::Value::Bool(false));

    // Restart through the API brings it back.
    let resp = client
        .post(format!("http://{addr}/api/cameras/main/start"))
        .send()
        .await
        .unwrap();
    let body: serde_json::Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "started");
    wait_for_json(
        &client,
        &format!("http://{addr}/api/cameras/main/status"),
        |body| body["connected"] == serde_json::Value::Bool(true),
    )
    .await;
}
