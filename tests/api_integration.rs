//! Integration tests for the HTTP API
//!
//! Tests the command surface, perception ingestion and configuration
//! endpoints

use attention_synth::core::{
    create_router, AttentionController, AttentionService, CoordinateTransformer, CounterBank, Region, RegionTable,
    StaticTransforms,
};
use attention_synth::types::{AttentionConfig, Point3};
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn create_test_service() -> Arc<AttentionService> {
    let transformer = CoordinateTransformer::new(Box::new(StaticTransforms::new()), "device", Duration::from_millis(100));
    let regions = RegionTable::new().with_region("audience", Region::point(Point3::new(2.0, 0.0, 0.0)));
    let mut controller = AttentionController::new(transformer, Box::new(regions), CounterBank::from_seed(5));
    controller.apply_config(AttentionConfig::default()).unwrap();
    Arc::new(AttentionService::new(controller))
}

fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_router(create_test_service());

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["ticking"], false);
}

#[tokio::test]
async fn test_state_endpoint() {
    let app = create_router(create_test_service());

    let response = app
        .oneshot(Request::builder().uri("/state").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["modes"]["look_at"], "idle");
    assert_eq!(json["configured"], true);
    assert_eq!(json["synthesizer_rate"], 10.0);
}

#[tokio::test]
async fn test_set_eye_contact_by_name() {
    let app = create_router(create_test_service());

    let response = app
        .oneshot(post_json("/api/eyecontact", r#"{"mode": "triangle"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["eye_contact"], "triangle");
    assert_eq!(json["look_at"], "idle");
}

#[tokio::test]
async fn test_set_gaze_by_code() {
    let app = create_router(create_test_service());

    let response = app.oneshot(post_json("/api/gaze", r#"{"mode": "4"}"#)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["gaze"], "head_leads_gaze");
}

#[tokio::test]
async fn test_set_look_at_with_face_pin() {
    let service = create_test_service();
    let app = create_router(Arc::clone(&service));

    let response = app
        .oneshot(post_json("/api/lookat", r#"{"mode": "one_face", "id": 12}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["look_at"], "one_face");
    assert_eq!(service.status().await.wanted_face_id, 12);
}

#[tokio::test]
async fn test_unknown_mode_is_bad_request() {
    let app = create_router(create_test_service());

    let response = app
        .oneshot(post_json("/api/mirroring", r#"{"mode": "ears"}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("ears"));
}

#[tokio::test]
async fn test_bad_region_code_is_bad_request() {
    let app = create_router(create_test_service());

    let response = app
        .oneshot(post_json("/api/lookat", r#"{"mode": "region", "id": 9}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_post_perception() {
    let service = create_test_service();
    let app = create_router(Arc::clone(&service));

    let body = r#"{
        "faces": [
            {"id": 1, "position": {"x": 1.0, "y": 0.0, "z": 0.0}},
            {"id": 2, "position": {"x": 1.0, "y": 0.4, "z": 0.1},
             "features": {"left_brow": 0.2, "right_brow": 0.2, "left_eyelid": 1.0,
                          "right_eyelid": 1.0, "mouth_open": 0.5}}
        ],
        "salient_points": [{"position": {"x": 2.0, "y": 1.0, "z": 0.0}}]
    }"#;
    let response = app.oneshot(post_json("/perception", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["faces"], 2);
    assert_eq!(json["salient_points"], 1);

    let status = service.status().await;
    assert_eq!(status.face_count, 2);
    assert_eq!(status.current_face, Some(0));
    assert_eq!(status.current_salient, Some(0));
}

#[tokio::test]
async fn test_post_config() {
    let service = create_test_service();
    let app = create_router(Arc::clone(&service));

    let body = r#"{
        "synthesizer_rate": 20.0,
        "region_time": {"min": 2.0, "max": 1.0},
        "modes": {"eye_contact": "both_eyes", "look_at": "all_faces",
                  "mirroring": "idle", "gaze": "gaze_and_head"}
    }"#;
    let response = app.oneshot(post_json("/config", body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["look_at"], "all_faces");
    assert_eq!(json["gaze"], "gaze_and_head");
    assert_eq!(service.status().await.synthesizer_rate, 20.0);
}

#[tokio::test]
async fn test_invalid_config_is_bad_request() {
    let app = create_router(create_test_service());

    let response = app
        .oneshot(post_json("/config", r#"{"synthesizer_rate": -1.0}"#))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_rejected() {
    let app = create_router(create_test_service());

    let response = app.oneshot(post_json("/perception", "{not json")).await.unwrap();

    assert!(response.status().is_client_error());
}
