#![allow(dead_code)]

//! Test infrastructure for ds-server API tests

use ds_auth::JwtValidator;
use ds_ws::{AppState, ConnectionConfig, HubRegistry, Metrics, ShutdownCoordinator};

use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{body::Body, http::Request, http::StatusCode, Router};
use http_body_util::BodyExt;
use jsonwebtoken::{EncodingKey, Header, encode};
use serde::Serialize;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &[u8] = b"test-secret-key-for-admin-tests";

#[derive(Serialize)]
struct TestJwtClaims {
    sub: String,
    exp: u64,
    iat: u64,
}

/// Create AppState for testing (auth disabled)
pub fn create_test_app_state() -> AppState {
    let metrics = Metrics::new();

    AppState {
        jwt_validator: None,
        hubs: HubRegistry::new(64, metrics.clone()),
        metrics,
        shutdown: ShutdownCoordinator::new(),
        config: ConnectionConfig::default(),
    }
}

/// Create AppState with HS256 authentication enabled
pub fn create_test_app_state_with_auth() -> AppState {
    AppState {
        jwt_validator: Some(Arc::new(JwtValidator::with_hs256(TEST_JWT_SECRET))),
        ..create_test_app_state()
    }
}

/// Create a token valid for one hour
pub fn create_test_token(user_id: &str, jwt_secret: &[u8]) -> String {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("Time went backwards")
        .as_secs();

    let claims = TestJwtClaims {
        sub: user_id.to_string(),
        exp: now + 3600,
        iat: now,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret),
    )
    .expect("Failed to encode JWT")
}

/// Send a request through the router and decode the response body
pub async fn send(app: Router, request: Request<Body>) -> (StatusCode, String) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    (status, String::from_utf8(body.to_vec()).unwrap())
}

pub fn post_broadcast(document_id: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/admin/documents/{}/broadcast", document_id))
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn post_broadcast_with_token(document_id: &str, body: &str, token: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/admin/documents/{}/broadcast", document_id))
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {}", token))
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}
