//! Integration tests for the authentication flow.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{Value, json};
use uuid::Uuid;

use crate::helpers::{PASSWORD, TestApp};

fn field<'a>(body: &'a Value, name: &str) -> &'a str {
    body.get(name)
        .and_then(Value::as_str)
        .unwrap_or_else(|| panic!("No {name} in {body:?}"))
}

#[tokio::test]
async fn test_login_success() {
    let app = TestApp::new();
    app.create_test_user("ada@example.com").await;

    let body = app.login("ada@example.com").await;

    assert_eq!(field(&body, "token_type"), "Bearer");
    assert!(!field(&body, "access_token").is_empty());
    assert_eq!(field(&body, "refresh_token").len(), 43);
    assert!(body.get("access_expires_at").is_some());
    assert!(body.get("refresh_expires_at").is_some());
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = TestApp::new();
    app.create_test_user("ada@example.com").await;

    let wrong_password = app
        .post_json(
            "/auth/login",
            json!({"email": "ada@example.com", "password": "nope"}),
            None,
        )
        .await;
    let unknown_user = app
        .post_json(
            "/auth/login",
            json!({"email": "nobody@example.com", "password": PASSWORD}),
            None,
        )
        .await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_user.body);
}

#[tokio::test]
async fn test_refresh_rotates_secret() {
    let app = TestApp::new();
    app.create_test_user("ada@example.com").await;
    let login = app.login("ada@example.com").await;
    let first = field(&login, "refresh_token");

    let refreshed = app
        .post_json("/auth/refresh", json!({"refresh_token": first}), None)
        .await;

    assert_eq!(refreshed.status, StatusCode::OK);
    let second = field(&refreshed.body, "refresh_token");
    assert_ne!(first, second);

    let me = app
        .get("/auth/me", Some(field(&refreshed.body, "access_token")))
        .await;
    assert_eq!(me.status, StatusCode::OK);
}

#[tokio::test]
async fn test_reused_refresh_token_revokes_session() {
    let app = TestApp::new();
    app.create_test_user("ada@example.com").await;
    let login = app.login("ada@example.com").await;
    let stolen = field(&login, "refresh_token").to_string();

    let rotated = app
        .post_json("/auth/refresh", json!({"refresh_token": stolen}), None)
        .await;
    assert_eq!(rotated.status, StatusCode::OK);
    let current = field(&rotated.body, "refresh_token").to_string();

    let replay = app
        .post_json("/auth/refresh", json!({"refresh_token": stolen}), None)
        .await;
    assert_eq!(replay.status, StatusCode::UNAUTHORIZED);

    // The legitimate holder's newer secret died with the lineage.
    let after = app
        .post_json("/auth/refresh", json!({"refresh_token": current}), None)
        .await;
    assert_eq!(after.status, StatusCode::UNAUTHORIZED);

    let me = app
        .get("/auth/me", Some(field(&login, "access_token")))
        .await;
    let lineage: Uuid = field(&me.body, "session_id").parse().unwrap();
    let records = app.refresh_tokens.lineage(lineage).await;
    assert_eq!(records.len(), 2);
    assert!(records.iter().all(|r| r.is_revoked()));
}

#[tokio::test]
async fn test_refresh_with_garbage_is_401() {
    let app = TestApp::new();
    let response = app
        .post_json("/auth/refresh", json!({"refresh_token": "not-a-token"}), None)
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_is_idempotent() {
    let app = TestApp::new();
    app.create_test_user("ada@example.com").await;
    let login = app.login("ada@example.com").await;
    let secret = field(&login, "refresh_token");

    for _ in 0..2 {
        let response = app
            .post_json("/auth/logout", json!({"refresh_token": secret}), None)
            .await;
        assert_eq!(response.status, StatusCode::NO_CONTENT);
    }

    let unknown = app
        .post_json("/auth/logout", json!({"refresh_token": "never-issued"}), None)
        .await;
    assert_eq!(unknown.status, StatusCode::NO_CONTENT);

    let refresh = app
        .post_json("/auth/refresh", json!({"refresh_token": secret}), None)
        .await;
    assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_tolerates_missing_or_malformed_body() {
    let app = TestApp::new();

    let bodies: [(Option<&str>, &str); 4] = [
        (Some("application/json"), ""),
        (Some("application/json"), "{}"),
        (Some("application/json"), "not json"),
        (None, r#"{"refresh_token":"never-issued"}"#),
    ];
    for (content_type, body) in bodies {
        let mut req = Request::builder().method("POST").uri("/auth/logout");
        if let Some(content_type) = content_type {
            req = req.header("Content-Type", content_type);
        }
        let response = app
            .send(req.body(Body::from(body.to_string())).unwrap())
            .await;
        assert_eq!(
            response.status,
            StatusCode::NO_CONTENT,
            "body {body:?} with content type {content_type:?}"
        );
    }
}

#[tokio::test]
async fn test_logout_without_content_type_still_revokes() {
    let app = TestApp::new();
    app.create_test_user("ada@example.com").await;
    let login = app.login("ada@example.com").await;
    let secret = field(&login, "refresh_token");

    let req = Request::builder()
        .method("POST")
        .uri("/auth/logout")
        .body(Body::from(json!({"refresh_token": secret}).to_string()))
        .unwrap();
    assert_eq!(app.send(req).await.status, StatusCode::NO_CONTENT);

    let refresh = app
        .post_json("/auth/refresh", json!({"refresh_token": secret}), None)
        .await;
    assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_end_to_end_session_lifecycle() {
    let app = TestApp::new();
    app.create_test_user("ada@example.com").await;
    let login = app.login("ada@example.com").await;
    let first = field(&login, "refresh_token").to_string();

    let rotated = app
        .post_json("/auth/refresh", json!({"refresh_token": first}), None)
        .await;
    assert_eq!(rotated.status, StatusCode::OK);
    let second = field(&rotated.body, "refresh_token").to_string();
    assert_ne!(first, second);

    let rotated_again = app
        .post_json("/auth/refresh", json!({"refresh_token": second}), None)
        .await;
    assert_eq!(rotated_again.status, StatusCode::OK);
    let newest = field(&rotated_again.body, "refresh_token").to_string();
    let access = field(&rotated_again.body, "access_token").to_string();
    assert_eq!(app.get("/auth/me", Some(&access)).await.status, StatusCode::OK);

    let logout = app
        .post_json("/auth/logout", json!({"refresh_token": newest}), None)
        .await;
    assert_eq!(logout.status, StatusCode::NO_CONTENT);

    for secret in [&newest, &second, &first] {
        let response = app
            .post_json("/auth/refresh", json!({"refresh_token": secret}), None)
            .await;
        assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_me_returns_claims() {
    let app = TestApp::new();
    let user_id = app.create_test_user("ada@example.com").await;
    let login = app.login("ada@example.com").await;

    let response = app
        .get("/auth/me", Some(field(&login, "access_token")))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(field(&response.body, "user_id"), user_id.to_string());
    assert_eq!(field(&response.body, "role"), "student");
}

#[tokio::test]
async fn test_me_requires_valid_bearer() {
    let app = TestApp::new();

    let missing = app.get("/auth/me", None).await;
    let garbage = app.get("/auth/me", Some("abc.def.ghi")).await;

    assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_logout_all_revokes_every_session() {
    let app = TestApp::new();
    app.create_test_user("ada@example.com").await;
    let laptop = app.login("ada@example.com").await;
    let phone = app.login("ada@example.com").await;

    let response = app
        .post_json(
            "/auth/logout-all",
            json!({}),
            Some(field(&laptop, "access_token")),
        )
        .await;
    assert_eq!(response.status, StatusCode::NO_CONTENT);

    for session in [&laptop, &phone] {
        let refresh = app
            .post_json(
                "/auth/refresh",
                json!({"refresh_token": field(session, "refresh_token")}),
                None,
            )
            .await;
        assert_eq!(refresh.status, StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn test_logout_all_requires_bearer() {
    let app = TestApp::new();
    let response = app.post_json("/auth/logout-all", json!({}), None).await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_health() {
    let app = TestApp::new();
    let response = app.get("/health", None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(field(&response.body, "status"), "ok");
    assert!(response.body.get("database").is_none());
}
