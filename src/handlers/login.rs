//! Login handler.
//!
//! Thin HTTP layer over the OTP challenge engine: classifies the device
//! from request metadata, runs the attempt, and maps the outcome to a
//! status code. All decisions live in the engine.

use axum::http::{header, HeaderMap};
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::device;
use crate::domain::{DeviceHints, LoginAttempt, Outcome, RejectReason, Restriction};
use crate::handlers::shared_types::ErrorResponse;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    //
    pub email: String,
    pub password: String,
    pub otp: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    //
    pub success: bool,
    pub message: String,
    pub require_otp: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

/// Builds device hints from the request headers.
///
/// The forwarded-for header is taken at face value; like the browser
/// family, it is a hint for the login history, not a security boundary.
pub(super) fn hints_from_headers(headers: &HeaderMap) -> DeviceHints {
    // ---
    let user_agent = headers
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();

    let classification = device::classify(user_agent);

    let ip = headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .unwrap_or("unknown")
        .trim()
        .to_string();

    DeviceHints {
        browser: classification.browser,
        os: classification.os,
        device_type: classification.device_type,
        ip,
    }
}

/// Handles `POST /auth/login`.
///
/// # Responses
/// - `200 OK` with a token on full authentication
/// - `200 OK` with `require_otp: true` when a challenge was issued
/// - `401 Unauthorized` on credential or OTP rejection
/// - `403 Forbidden` when the mobile-hours restriction applies
/// - `502 Bad Gateway` when OTP delivery failed
#[tracing::instrument(skip(state, headers, req))]
pub async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(req): Json<LoginRequest>,
) -> Result<(StatusCode, Json<LoginResponse>), (StatusCode, Json<ErrorResponse>)> {
    // ---
    let attempt = LoginAttempt {
        identifier: req.email,
        credential: req.password,
        otp: req.otp,
        hints: hints_from_headers(&headers),
    };

    let now = chrono::Local::now().fixed_offset();

    let outcome = state
        .engine()
        .attempt_login(&attempt, now)
        .await
        .map_err(|err| {
            //
            tracing::error!("login attempt failed: {:?}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                }),
            )
        })?;

    let message = outcome.message().to_string();

    match outcome {
        Outcome::Authenticated { token } => {
            //
            state.metrics().record_login_succeeded();
            Ok((
                StatusCode::OK,
                Json(LoginResponse {
                    success: true,
                    message,
                    require_otp: false,
                    token: Some(token),
                }),
            ))
        }
        Outcome::ChallengeRequired => {
            //
            state.metrics().record_challenge_issued();
            Ok((
                StatusCode::OK,
                Json(LoginResponse {
                    success: false,
                    message,
                    require_otp: true,
                    token: None,
                }),
            ))
        }
        Outcome::Rejected(reason) => {
            //
            state.metrics().record_login_rejected(outcome_kind(&reason));
            Err((StatusCode::UNAUTHORIZED, Json(ErrorResponse { error: message })))
        }
        Outcome::Restricted(Restriction::MobileHours) => {
            //
            state.metrics().record_login_rejected("mobile_hours");
            Err((StatusCode::FORBIDDEN, Json(ErrorResponse { error: message })))
        }
        Outcome::NotificationFailed => {
            //
            state.metrics().record_login_rejected("notification_failed");
            Err((StatusCode::BAD_GATEWAY, Json(ErrorResponse { error: message })))
        }
        // Reset-flow outcomes cannot come out of attempt_login.
        Outcome::ResetIssued | Outcome::Restricted(Restriction::ResetAlreadyRequested) => {
            //
            tracing::error!("unexpected outcome from login attempt");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                }),
            ))
        }
    }
}

fn outcome_kind(reason: &RejectReason) -> &'static str {
    // ---
    match reason {
        RejectReason::InvalidCredentials => "invalid_credentials",
        RejectReason::InvalidOrExpiredOtp => "invalid_or_expired_otp",
        RejectReason::UserNotFound => "user_not_found",
    }
}
