use axum::{
    extract::Extension,
    http::{header::RETRY_AFTER, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use super::{normalize_email, valid_email, OtpState};
use crate::otp::GenerateError;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct GenerateOtpRequest {
    pub email: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct GenerateOtpResponse {
    /// Returned in place of email delivery, which the frontend owns.
    pub code: String,
    /// Seconds until the code expires.
    pub expires_in: u64,
}

#[utoipa::path(
    post,
    path = "/v1/auth/otp/generate",
    request_body = GenerateOtpRequest,
    responses (
        (status = 200, description = "Code issued", body = GenerateOtpResponse),
        (status = 400, description = "Missing payload or invalid email", body = String),
        (status = 429, description = "Too many codes requested in the current window", body = String)
    ),
    tag = "otp",
)]
#[instrument(skip(state, payload))]
pub async fn generate_otp(
    state: Extension<Arc<OtpState>>,
    payload: Option<Json<GenerateOtpRequest>>,
) -> impl IntoResponse {
    let request: GenerateOtpRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    if !valid_email(&email) {
        return (
            StatusCode::BAD_REQUEST,
            "Invalid email address".to_string(),
        )
            .into_response();
    }

    match state.manager().generate(&email) {
        Ok(issued) => {
            debug!("Issued code for {}", email);
            (
                StatusCode::OK,
                Json(GenerateOtpResponse {
                    code: issued.code,
                    expires_in: issued.expires_in.as_secs(),
                }),
            )
                .into_response()
        }
        Err(GenerateError::RateLimited {
            retry_after_seconds,
        }) => {
            debug!("Rate limited generate for {}", email);
            let mut headers = HeaderMap::new();
            if let Ok(value) = HeaderValue::from_str(&retry_after_seconds.to_string()) {
                headers.insert(RETRY_AFTER, value);
            }
            (
                StatusCode::TOO_MANY_REQUESTS,
                headers,
                "Too many OTP requests. Please try again later.".to_string(),
            )
                .into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{generate_otp, GenerateOtpRequest, GenerateOtpResponse};
    use crate::api::handlers::OtpState;
    use crate::otp::{MemoryOtpStore, OtpConfig, OtpManager};
    use anyhow::Result;
    use axum::{
        body::to_bytes,
        extract::Extension,
        http::StatusCode,
        response::IntoResponse,
        Json,
    };
    use std::sync::Arc;

    fn state() -> Extension<Arc<OtpState>> {
        let manager = OtpManager::new(Arc::new(MemoryOtpStore::new()), OtpConfig::default());
        Extension(Arc::new(OtpState::new(manager)))
    }

    fn request(email: &str) -> Option<Json<GenerateOtpRequest>> {
        Some(Json(GenerateOtpRequest {
            email: email.to_string(),
        }))
    }

    #[tokio::test]
    async fn missing_payload_is_bad_request() {
        let response = generate_otp(state(), None).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn invalid_email_is_bad_request() {
        let response = generate_otp(state(), request("not-an-email"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn issues_six_digit_code_with_default_window() -> Result<()> {
        let response = generate_otp(state(), request("a@x.com"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let body = to_bytes(response.into_body(), usize::MAX).await?;
        let payload: GenerateOtpResponse = serde_json::from_slice(&body)?;
        assert_eq!(payload.code.len(), 6);
        assert!(payload.code.chars().all(|c| c.is_ascii_digit()));
        assert_eq!(payload.expires_in, 600);
        Ok(())
    }

    #[tokio::test]
    async fn fourth_request_gets_429_with_retry_after() {
        let state = state();
        for _ in 0..3 {
            let response = generate_otp(state.clone(), request("a@x.com"))
                .await
                .into_response();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = generate_otp(state, request("a@x.com"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert!(response.headers().contains_key("retry-after"));
    }

    #[tokio::test]
    async fn email_is_normalized_before_rate_limiting() {
        let state = state();
        for email in [" A@X.com ", "a@x.COM", "A@x.com"] {
            let response = generate_otp(state.clone(), request(email))
                .await
                .into_response();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = generate_otp(state, request("a@x.com"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
