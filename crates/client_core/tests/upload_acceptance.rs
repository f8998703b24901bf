use std::{
    env, fs,
    path::PathBuf,
    time::{Duration, Instant, SystemTime, UNIX_EPOCH},
};

use axum::{extract::Multipart, routing::post, Json, Router};
use client_core::{HttpClassificationTransport, Settings, UploadController};
use serde_json::{json, Value};
use shared::domain::{Badge, UploadState};
use tokio::net::TcpListener;

async fn legacy_shape(mut multipart: Multipart) -> Json<Value> {
    let mut file_name = None;
    while let Ok(Some(field)) = multipart.next_field().await {
        if field.name() == Some("file") {
            file_name = field.file_name().map(str::to_string);
        }
    }
    Json(json!({
        "prediction": "MDD",
        "probability": 0.875,
        "received": file_name,
    }))
}

async fn model_unavailable(_multipart: Multipart) -> Json<Value> {
    Json(json!({"error": "model unavailable"}))
}

async fn spawn_service() -> Settings {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    let app = Router::new()
        .route("/api/full-pipeline", post(legacy_shape))
        .route("/broken-pipeline", post(model_unavailable));
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    Settings {
        server_url: format!("http://{addr}"),
        endpoint_path: "/api/full-pipeline".into(),
        upload_timeout_hint_secs: 30,
    }
}

fn write_recording(name: &str) -> (PathBuf, PathBuf) {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("eeg_upload_acceptance_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join(name);
    fs::write(&path, b"fake-eeg-payload").expect("write");
    (dir, path)
}

#[tokio::test]
async fn legacy_response_flows_through_to_page_view() {
    let settings = spawn_service().await;
    let transport = HttpClassificationTransport::from_settings(&settings).expect("transport");
    let (dir, path) = write_recording("02020008_rest.raw");

    let mut controller = UploadController::new();
    controller.select(Some(path));
    controller.submit(&transport).await.expect("submit");

    let view = controller.view(Instant::now() + Duration::from_secs(1));
    assert_eq!(view.state, UploadState::Success);
    assert_eq!(view.filename_indicator, "Selected File: 02020008_rest.raw");
    assert!(view.submit_enabled);
    assert!(!view.progress_visible);
    let result = view.result.expect("result");
    assert_eq!(result.label, "MDD");
    assert_eq!(result.percent, 88);
    assert_eq!(result.badge, Badge::ConditionDetected);
    assert!(result.raw_json.contains("\"received\": \"02020008_rest.raw\""));

    fs::remove_dir_all(dir).expect("cleanup");
}

#[tokio::test]
async fn service_error_field_surfaces_without_result() {
    let mut settings = spawn_service().await;
    settings.endpoint_path = "/broken-pipeline".into();
    let transport = HttpClassificationTransport::from_settings(&settings).expect("transport");
    let (dir, path) = write_recording("subject.npz");

    let mut controller = UploadController::new();
    controller.select(Some(path));
    controller.submit(&transport).await.expect_err("service error");

    let view = controller.view(Instant::now());
    assert_eq!(view.state, UploadState::Error);
    assert!(view.result.is_none());
    assert_eq!(view.alert.as_deref(), Some("Error: model unavailable"));
    assert!(view.submit_enabled);

    controller.reset().expect("reset");
    assert_eq!(controller.state(), UploadState::Idle);

    fs::remove_dir_all(dir).expect("cleanup");
}
