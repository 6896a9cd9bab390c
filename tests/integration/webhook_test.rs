//! Integration tests for the video pipeline webhook.

use axum::http::StatusCode;
use chrono::Utc;
use serde_json::json;

use coursehub_entity::lesson::AssetStatus;

use crate::helpers::{TestApp, WEBHOOK_SECRET, asset_event, sign, upload_event};

fn ack(response: &crate::helpers::TestResponse) -> &str {
    response.body["status"].as_str().unwrap_or_default()
}

#[tokio::test]
async fn test_asset_lifecycle_reaches_ready() {
    let app = TestApp::new();
    let lesson = app.create_lesson("up-1").await;

    let created = app
        .deliver(&asset_event("evt-1", "video.asset.created", "as-1", "up-1"))
        .await;
    assert_eq!(created.status, StatusCode::OK);
    assert_eq!(ack(&created), "accepted");

    let ready = json!({
        "id": "evt-2",
        "type": "video.asset.ready",
        "data": {
            "id": "as-1",
            "upload_id": "up-1",
            "playback_ids": [{"id": "pb-1", "policy": "public"}],
            "duration": 61.5
        }
    });
    let response = app.deliver(&ready).await;
    assert_eq!(ack(&response), "accepted");

    let stored = app.content.get(lesson).await.unwrap();
    assert_eq!(stored.status, AssetStatus::Ready);
    assert_eq!(stored.asset_id.as_deref(), Some("as-1"));
    assert_eq!(stored.playback_id.as_deref(), Some("pb-1"));
    assert_eq!(stored.duration_seconds, Some(61.5));
}

#[tokio::test]
async fn test_redelivery_is_acknowledged_once() {
    let app = TestApp::new();
    let lesson = app.create_lesson("up-1").await;
    let event = asset_event("evt-1", "video.asset.created", "as-1", "up-1");

    let first = app.deliver(&event).await;
    let second = app.deliver(&event).await;

    assert_eq!(first.status, StatusCode::OK);
    assert_eq!(second.status, StatusCode::OK);
    assert_eq!(ack(&first), "accepted");
    assert_eq!(ack(&second), "duplicate");
    assert_eq!(
        app.content.get(lesson).await.unwrap().status,
        AssetStatus::Created
    );
}

#[tokio::test]
async fn test_concurrent_redelivery_applies_once() {
    let app = TestApp::new();
    app.create_lesson("up-1").await;
    let event = asset_event("evt-1", "video.asset.created", "as-1", "up-1");

    let (a, b) = tokio::join!(app.deliver(&event), app.deliver(&event));

    let mut acks = [ack(&a).to_string(), ack(&b).to_string()];
    acks.sort();
    assert_eq!(acks, ["accepted", "duplicate"]);
}

#[tokio::test]
async fn test_bad_signature_is_rejected_without_side_effects() {
    let app = TestApp::new();
    let lesson = app.create_lesson("up-1").await;
    let body = asset_event("evt-1", "video.asset.created", "as-1", "up-1")
        .to_string()
        .into_bytes();

    let forged = sign("not-the-secret", Utc::now().timestamp(), &body);
    let response = app
        .post_webhook(&body, Some(("mux-signature", forged)))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    let missing = app.post_webhook(&body, None).await;
    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);

    let mut tampered = body.clone();
    tampered.extend_from_slice(b" ");
    let header = sign(WEBHOOK_SECRET, Utc::now().timestamp(), &body);
    let response = app
        .post_webhook(&tampered, Some(("mux-signature", header)))
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);

    assert_eq!(
        app.content.get(lesson).await.unwrap().status,
        AssetStatus::Pending
    );
}

#[tokio::test]
async fn test_stale_timestamp_is_rejected() {
    let app = TestApp::new();
    app.create_lesson("up-1").await;
    let body = asset_event("evt-1", "video.asset.created", "as-1", "up-1")
        .to_string()
        .into_bytes();

    let header = sign(WEBHOOK_SECRET, Utc::now().timestamp() - 3600, &body);
    let response = app
        .post_webhook(&body, Some(("mux-signature", header)))
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_alternate_signature_header() {
    let app = TestApp::new();
    app.create_lesson("up-1").await;
    let body = asset_event("evt-1", "video.asset.created", "as-1", "up-1")
        .to_string()
        .into_bytes();

    let header = sign(WEBHOOK_SECRET, Utc::now().timestamp(), &body);
    let response = app
        .post_webhook(&body, Some(("x-mux-signature", header)))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(ack(&response), "accepted");
}

#[tokio::test]
async fn test_unparseable_body_is_400() {
    let app = TestApp::new();
    let body = b"{\"id\": 42".to_vec();
    let header = sign(WEBHOOK_SECRET, Utc::now().timestamp(), &body);

    let response = app
        .post_webhook(&body, Some(("mux-signature", header)))
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_event_type_is_ignored() {
    let app = TestApp::new();
    let event = json!({
        "id": "evt-1",
        "type": "video.live_stream.active",
        "data": {"id": "ls-1"}
    });

    let response = app.deliver(&event).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(ack(&response), "ignored");
}

#[tokio::test]
async fn test_unknown_lesson_is_unroutable() {
    let app = TestApp::new();

    let response = app
        .deliver(&asset_event("evt-1", "video.asset.ready", "as-9", "up-9"))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(ack(&response), "unroutable");
}

#[tokio::test]
async fn test_ready_before_created_stays_ready() {
    let app = TestApp::new();
    let lesson = app.create_lesson("up-1").await;

    app.deliver(&asset_event("evt-2", "video.asset.ready", "as-1", "up-1"))
        .await;
    let late = app
        .deliver(&asset_event("evt-1", "video.asset.created", "as-1", "up-1"))
        .await;

    assert_eq!(ack(&late), "accepted");
    assert_eq!(
        app.content.get(lesson).await.unwrap().status,
        AssetStatus::Ready
    );
}

#[tokio::test]
async fn test_cancelled_upload_is_sticky() {
    let app = TestApp::new();
    let lesson = app.create_lesson("up-1").await;

    let cancelled = app
        .deliver(&upload_event("evt-1", "video.upload.cancelled", "up-1"))
        .await;
    assert_eq!(ack(&cancelled), "accepted");

    app.deliver(&asset_event("evt-2", "video.asset.created", "as-1", "up-1"))
        .await;
    app.deliver(&asset_event("evt-3", "video.asset.ready", "as-1", "up-1"))
        .await;

    assert_eq!(
        app.content.get(lesson).await.unwrap().status,
        AssetStatus::Cancelled
    );
}

#[tokio::test]
async fn test_asset_error_records_message() {
    let app = TestApp::new();
    let lesson = app.create_lesson("up-1").await;
    app.deliver(&asset_event("evt-0", "video.asset.created", "as-1", "up-1"))
        .await;
    let errored = json!({
        "id": "evt-1",
        "type": "video.asset.errored",
        "data": {
            "id": "as-1",
            "upload_id": "up-1",
            "errors": {"type": "invalid_input", "messages": ["Unsupported codec"]}
        }
    });

    app.deliver(&errored).await;

    let stored = app.content.get(lesson).await.unwrap();
    assert_eq!(stored.status, AssetStatus::Errored);
    assert_eq!(stored.error_message.as_deref(), Some("Unsupported codec"));
}

#[tokio::test]
async fn test_asset_error_before_created_leaves_lesson_pending() {
    let app = TestApp::new();
    let lesson = app.create_lesson("up-1").await;

    let stray = app
        .deliver(&asset_event("evt-1", "video.asset.errored", "as-1", "up-1"))
        .await;
    assert_eq!(stray.status, StatusCode::OK);
    assert_eq!(
        app.content.get(lesson).await.unwrap().status,
        AssetStatus::Pending
    );

    app.deliver(&asset_event("evt-2", "video.asset.created", "as-1", "up-1"))
        .await;
    app.deliver(&asset_event("evt-3", "video.asset.ready", "as-1", "up-1"))
        .await;
    assert_eq!(
        app.content.get(lesson).await.unwrap().status,
        AssetStatus::Ready
    );
}
