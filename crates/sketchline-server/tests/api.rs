//! End-to-end tests: the HTTP client and sync service against a live router.

use sketchline_core::config::SyncConfig;
use sketchline_core::input::{CanvasGeometry, InputEvent};
use sketchline_core::shapes::{ShapeError, ShapeKind};
use sketchline_core::sync::{RemoteStore, ShapeRecord, SyncError};
use sketchline_core::{Canvas, HttpRemote, SceneStore, SyncService};
use axum::{Router, routing::get};
use sketchline_server::{AppState, router};
use std::net::SocketAddr;
use std::sync::Arc;

/// Pointer move to a client-space position.
fn moved(x: f64, y: f64) -> InputEvent {
    InputEvent::PointerMoved((x, y).into())
}

/// Serve `app` on an ephemeral port.
async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

fn remote_for(addr: SocketAddr) -> HttpRemote {
    let config = SyncConfig {
        api_base_url: format!("http://{}", addr),
        owner_id: None,
    };
    HttpRemote::from_config(&config).unwrap()
}

/// Serve a fresh store and return a client for it.
async fn spawn_server() -> HttpRemote {
    remote_for(serve(router(Arc::new(AppState::new()))).await)
}

fn draw(canvas: &mut Canvas, mode: &str, from: (f64, f64), to: (f64, f64)) {
    canvas.handle_event(&InputEvent::ModeKey(mode.into())).unwrap();
    canvas.handle_event(&moved(from.0, from.1)).unwrap();
    canvas.handle_event(&InputEvent::Click).unwrap();
    canvas.handle_event(&moved(to.0, to.1)).unwrap();
    canvas.handle_event(&InputEvent::Click).unwrap();
}

#[tokio::test]
async fn test_login_returns_stable_owner_id() {
    let remote = spawn_server().await;

    let id = remote.login(&[("username", "ana"), ("password", "pw")]).await.unwrap();
    let again = remote.login(&[("username", "ana"), ("password", "pw")]).await.unwrap();
    assert_eq!(id, again);

    let wrong = remote.login(&[("username", "ana"), ("password", "nope")]).await;
    assert_eq!(wrong, Err(SyncError::Status(401)));

    let missing = remote.login(&[("username", "ana")]).await;
    assert_eq!(missing, Err(SyncError::Status(400)));
}

#[tokio::test]
async fn test_push_then_pull_round_trip() {
    let remote = spawn_server().await;
    let owner = remote.login(&[("username", "ben"), ("password", "pw")]).await.unwrap();

    let mut canvas = Canvas::new(CanvasGeometry::from_size(400.0, 400.0), ShapeKind::Line);
    draw(&mut canvas, "l", (0.0, 0.0), (400.0, 400.0));
    draw(&mut canvas, "b", (100.0, 300.0), (300.0, 100.0));

    let mut sync = SyncService::new(remote, owner.clone());
    assert!(sync.controls(&canvas.scene).save_armed);
    let report = sync.push(&mut canvas.scene).await;
    assert_eq!(report.saved, 2);
    assert!(!report.retry_needed());
    assert!(!canvas.scene.has_dirty());
    assert!(!sync.controls(&canvas.scene).save_armed);

    let mut reloaded = SceneStore::new();
    let load = sync.pull(&mut reloaded).await.unwrap();
    assert_eq!(load.loaded, 2);
    assert!(load.skipped.is_empty());
    assert!(!reloaded.has_dirty());

    for (original, restored) in canvas.scene.iter().zip(reloaded.iter()) {
        assert_eq!(restored.kind(), original.kind());
        assert_eq!(restored.flattened_points(), original.flattened_points());
    }
    assert_eq!(
        reloaded.get(0).unwrap().flattened_points(),
        vec![-1.0, 1.0, 1.0, -1.0]
    );
}

#[tokio::test]
async fn test_pull_skips_unknown_records() {
    let remote = spawn_server().await;
    for (kind, points) in [
        ("Triangle", vec![0.0, 0.0, 1.0, 0.0, 0.5, 1.0]),
        ("Line", vec![0.0, 0.0, 1.0, 1.0]),
    ] {
        let record = ShapeRecord {
            kind: kind.to_string(),
            points,
            user_id: "carol".to_string(),
        };
        remote.save_shape(&record).await.unwrap();
    }

    let mut sync = SyncService::new(remote, "carol");
    let mut scene = SceneStore::new();
    let report = sync.pull(&mut scene).await.unwrap();

    assert_eq!(report.loaded, 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(
        report.skipped[0].error,
        ShapeError::UnknownShapeType("Triangle".to_string())
    );
    assert_eq!(scene.get(0).unwrap().kind(), ShapeKind::Line);
}

#[tokio::test]
async fn test_server_rejects_odd_coordinates() {
    let remote = spawn_server().await;
    let record = ShapeRecord {
        kind: "Line".to_string(),
        points: vec![0.0, 0.0, 1.0],
        user_id: "dan".to_string(),
    };
    assert_eq!(remote.save_shape(&record).await, Err(SyncError::Status(400)));
    assert!(remote.load_shapes("dan").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_unreachable_store_keeps_shapes_dirty() {
    // Bind then drop a listener so the port refuses connections.
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    let remote = remote_for(addr);

    let mut canvas = Canvas::default();
    draw(&mut canvas, "l", (10.0, 10.0), (20.0, 20.0));

    let mut sync = SyncService::new(remote, "erin");
    let report = sync.push(&mut canvas.scene).await;
    assert_eq!(report.failures.len(), 1);
    assert!(matches!(report.failures[0].error, SyncError::Transport(_)));
    assert!(canvas.scene.has_dirty());
    assert!(sync.controls(&canvas.scene).save_armed);

    let mut scene = SceneStore::new();
    assert!(sync.pull(&mut scene).await.is_err());
    assert!(scene.is_empty());
    assert!(sync.controls(&scene).load_armed);
}

#[tokio::test]
async fn test_undecodable_body_leaves_scene_unchanged() {
    // A store that answers 200 with plain text where JSON is expected.
    let app = Router::new().route("/api/Shape/user/{id}", get(|| async { "ok" }));
    let remote = remote_for(serve(app).await);

    let result = remote.load_shapes("frank").await;
    assert!(matches!(result, Err(SyncError::Decode(_))));

    let mut sync = SyncService::new(remote, "frank");
    let mut scene = SceneStore::new();
    let result = sync.pull(&mut scene).await;
    assert!(matches!(result, Err(SyncError::Decode(_))));
    assert!(scene.is_empty());
    assert!(sync.controls(&scene).load_armed);
}

#[tokio::test]
async fn test_malformed_save_body_is_bad_request() {
    let addr = serve(router(Arc::new(AppState::new()))).await;
    let url = format!("http://{}/api/Shape", addr);
    let client = reqwest::Client::new();

    for body in [
        r#"{"type": "Line", "points": [0.0, 0.0, 1.0, 1.0]}"#,
        r#"{"type": "Line", "userId": "gina"}"#,
        "not json",
    ] {
        let response = client
            .post(&url)
            .header("content-type", "application/json")
            .body(body)
            .send()
            .await
            .unwrap();
        assert_eq!(response.status().as_u16(), 400, "body: {}", body);
    }

    let remote = remote_for(addr);
    assert!(remote.load_shapes("gina").await.unwrap().is_empty());
}
