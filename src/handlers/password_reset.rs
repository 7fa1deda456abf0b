//! Password reset handler.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::domain::{Outcome, RejectReason, Restriction};
use crate::handlers::shared_types::ErrorResponse;

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    //
    /// Email or phone, whichever the user has on file.
    pub identifier: String,
}

#[derive(Debug, Serialize)]
pub struct ForgotPasswordResponse {
    //
    pub success: bool,
    pub message: String,
}

/// Handles `POST /auth/forgot-password`.
///
/// # Responses
/// - `200 OK` when a new password was generated and delivered
/// - `404 Not Found` for an unknown identifier
/// - `429 Too Many Requests` while the 24-hour cooldown is active
/// - `502 Bad Gateway` when delivery failed
#[tracing::instrument(skip(state, req))]
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> Result<(StatusCode, Json<ForgotPasswordResponse>), (StatusCode, Json<ErrorResponse>)> {
    // ---
    let now = chrono::Local::now().fixed_offset();

    let outcome = state
        .engine()
        .request_password_reset(&req.identifier, now)
        .await
        .map_err(|err| {
            //
            tracing::error!("password reset failed: {:?}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                }),
            )
        })?;

    let message = outcome.message().to_string();

    match outcome {
        Outcome::ResetIssued => {
            //
            state.metrics().record_reset_issued();
            Ok((
                StatusCode::OK,
                Json(ForgotPasswordResponse {
                    success: true,
                    message,
                }),
            ))
        }
        Outcome::Rejected(RejectReason::UserNotFound) => {
            //
            Err((StatusCode::NOT_FOUND, Json(ErrorResponse { error: message })))
        }
        Outcome::Restricted(Restriction::ResetAlreadyRequested) => {
            //
            Err((
                StatusCode::TOO_MANY_REQUESTS,
                Json(ErrorResponse { error: message }),
            ))
        }
        Outcome::NotificationFailed => {
            //
            Err((StatusCode::BAD_GATEWAY, Json(ErrorResponse { error: message })))
        }
        // Login-flow outcomes cannot come out of request_password_reset.
        _ => {
            //
            tracing::error!("unexpected outcome from password reset");
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                }),
            ))
        }
    }
}
