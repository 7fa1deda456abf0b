//! Signup handler.

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};

use crate::app_state::AppState;
use crate::domain::UserCredential;
use crate::handlers::shared_types::ErrorResponse;

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    //
    pub name: String,
    pub email: String,
    pub password: String,
    pub phone: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    //
    pub success: bool,
    pub message: String,
}

/// Handles `POST /auth/signup`.
///
/// # Responses
/// - `201 Created` on success
/// - `409 Conflict` if the email is already registered
#[tracing::instrument(skip(state, req))]
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<SignupResponse>), (StatusCode, Json<ErrorResponse>)> {
    // ---
    let existing = state
        .store()
        .find_by_identifier(&req.email)
        .await
        .map_err(internal_error)?;

    if existing.is_some() {
        return Err((
            StatusCode::CONFLICT,
            Json(ErrorResponse {
                error: "User already exists".to_string(),
            }),
        ));
    }

    let user = UserCredential::new(req.name, req.email, req.phone, req.password);

    state.store().create(user).await.map_err(internal_error)?;

    Ok((
        StatusCode::CREATED,
        Json(SignupResponse {
            success: true,
            message: "Signup successful".to_string(),
        }),
    ))
}

fn internal_error(err: anyhow::Error) -> (StatusCode, Json<ErrorResponse>) {
    // ---
    tracing::error!("signup failed: {:?}", err);
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: "Internal server error".to_string(),
        }),
    )
}
