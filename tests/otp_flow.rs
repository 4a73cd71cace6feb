//! End-to-end exercise of the OTP HTTP flow against the in-process router.

use anyhow::{Context, Result};
use axum::{
    body::{to_bytes, Body},
    http::{header::CONTENT_TYPE, Request, StatusCode},
    response::Response,
    Router,
};
use dayflow_otp::{
    api::{app, handlers::OtpState},
    otp::{MemoryOtpStore, OtpConfig, OtpManager},
};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

fn router_with_config(config: OtpConfig) -> Router {
    let manager = OtpManager::new(Arc::new(MemoryOtpStore::new()), config);
    app(Arc::new(OtpState::new(manager)))
}

fn router() -> Router {
    router_with_config(OtpConfig::default())
}

fn post(path: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(path)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request should build")
}

async fn json_body(response: Response) -> Result<Value> {
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    serde_json::from_slice(&bytes).context("body should be JSON")
}

async fn generate(router: &Router, email: &str) -> Result<Response> {
    let request = post("/v1/auth/otp/generate", json!({ "email": email }));
    Ok(router.clone().oneshot(request).await?)
}

async fn verify(router: &Router, email: &str, code: &str) -> Result<Response> {
    let request = post(
        "/v1/auth/otp/verify",
        json!({ "email": email, "code": code }),
    );
    Ok(router.clone().oneshot(request).await?)
}

#[tokio::test]
async fn generate_then_verify_consumes_the_code() -> Result<()> {
    let router = router();

    let response = generate(&router, "a@x.com").await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["expires_in"], 600);
    let code = body["code"].as_str().context("code should be a string")?;
    assert_eq!(code.len(), 6);
    assert!(code.chars().all(|c| c.is_ascii_digit()));

    let response = verify(&router, "a@x.com", code).await?;
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await?;
    assert_eq!(body["verified"], true);
    assert!(body["token"]
        .as_str()
        .is_some_and(|token| !token.is_empty()));

    // Single-use: the same code no longer exists server-side.
    let response = verify(&router, "a@x.com", code).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn verify_without_generate_is_rejected() -> Result<()> {
    let router = router();
    let response = verify(&router, "nobody@x.com", "123456").await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn fourth_generate_is_rate_limited() -> Result<()> {
    let router = router();
    for _ in 0..3 {
        let response = generate(&router, "a@x.com").await?;
        assert_eq!(response.status(), StatusCode::OK);
    }

    let response = generate(&router, "a@x.com").await?;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().contains_key("retry-after"));
    Ok(())
}

#[tokio::test]
async fn expired_code_is_rejected_with_expiry_message() -> Result<()> {
    let router =
        router_with_config(OtpConfig::default().with_validity_window(Duration::from_millis(10)));

    let response = generate(&router, "a@x.com").await?;
    let body = json_body(response).await?;
    let code = body["code"]
        .as_str()
        .context("code should be a string")?
        .to_string();

    tokio::time::sleep(Duration::from_millis(30)).await;

    let response = verify(&router, "a@x.com", &code).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = to_bytes(response.into_body(), usize::MAX).await?;
    let message = String::from_utf8(bytes.to_vec())?;
    assert!(message.contains("expired"), "got: {message}");
    Ok(())
}

#[tokio::test]
async fn invalid_email_is_rejected_before_issuance() -> Result<()> {
    let router = router();
    let response = generate(&router, "not-an-email").await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    Ok(())
}

#[tokio::test]
async fn requests_carry_a_request_id() -> Result<()> {
    let router = router();
    let request = Request::builder()
        .method("GET")
        .uri("/health")
        .body(Body::empty())?;
    let response = router.clone().oneshot(request).await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
    Ok(())
}
