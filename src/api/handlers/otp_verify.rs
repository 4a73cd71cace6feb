use axum::{
    extract::Extension,
    http::{header::CACHE_CONTROL, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Json},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::ToSchema;

use super::{generate_session_token, normalize_email, OtpState};
use crate::otp::VerifyError;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyOtpRequest {
    pub email: String,
    pub code: String,
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyOtpResponse {
    pub verified: bool,
    /// Session token minted on successful verification.
    pub token: String,
}

#[utoipa::path(
    post,
    path = "/v1/auth/otp/verify",
    request_body = VerifyOtpRequest,
    responses (
        (status = 200, description = "Code verified and consumed", body = VerifyOtpResponse),
        (status = 400, description = "Missing payload, no code issued, expired, or wrong code", body = String)
    ),
    tag = "otp",
)]
#[instrument(skip(state, payload))]
pub async fn verify_otp(
    state: Extension<Arc<OtpState>>,
    payload: Option<Json<VerifyOtpRequest>>,
) -> impl IntoResponse {
    let request: VerifyOtpRequest = match payload {
        Some(Json(payload)) => payload,
        None => return (StatusCode::BAD_REQUEST, "Missing payload".to_string()).into_response(),
    };

    let email = normalize_email(&request.email);
    let code = request.code.trim();
    if email.is_empty() || code.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            "Email and OTP are required".to_string(),
        )
            .into_response();
    }

    match state.manager().verify(&email, code) {
        Ok(()) => {
            debug!("Code verified for {}", email);
            let mut headers = HeaderMap::new();
            headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
            (
                StatusCode::OK,
                headers,
                Json(VerifyOtpResponse {
                    verified: true,
                    token: generate_session_token(),
                }),
            )
                .into_response()
        }
        Err(VerifyError::NotFound) => (
            StatusCode::BAD_REQUEST,
            "No OTP found for this email. Request a new one.".to_string(),
        )
            .into_response(),
        Err(VerifyError::Expired) => (
            StatusCode::BAD_REQUEST,
            "OTP has expired. Request a new one.".to_string(),
        )
            .into_response(),
        Err(VerifyError::InvalidCode) => (
            StatusCode::BAD_REQUEST,
            "Invalid OTP. Please try again.".to_string(),
        )
            .into_response(),
    }
}
