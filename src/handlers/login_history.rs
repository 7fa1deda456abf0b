//! Login history handler.
//!
//! Bearer-token authenticated: the token is validated against the Redis
//! session store and the history returned is the caller's own.

use axum::http::{header, HeaderMap};
use axum::{extract::State, http::StatusCode, Json};

use crate::app_state::AppState;
use crate::domain::LoginEvent;
use crate::handlers::shared_types::{ApiResponse, ErrorResponse};
use crate::session;

/// Handles `GET /auth/login-history`.
///
/// # Responses
/// - `200 OK` with the caller's login events, oldest first
/// - `401 Unauthorized` for a missing, unknown, or expired token
pub async fn login_history(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<ApiResponse<Vec<LoginEvent>>, (StatusCode, Json<ErrorResponse>)> {
    // ---
    let token = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(unauthorized)?;

    let mut conn = state.get_conn().await.map_err(|status| {
        //
        (
            status,
            Json(ErrorResponse {
                error: "Internal server error".to_string(),
            }),
        )
    })?;

    let info = session::validate_session(&mut conn, token)
        .await
        .map_err(|err| {
            //
            tracing::error!("session validation failed: {:?}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                }),
            )
        })?
        .ok_or_else(unauthorized)?;

    let user = state
        .store()
        .find_by_identifier(&info.identifier)
        .await
        .map_err(|err| {
            //
            tracing::error!("failed to load user for history: {:?}", err);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorResponse {
                    error: "Internal server error".to_string(),
                }),
            )
        })?
        .ok_or_else(unauthorized)?;

    Ok(ApiResponse {
        data: user.login_history,
    })
}

fn unauthorized() -> (StatusCode, Json<ErrorResponse>) {
    // ---
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            error: "Authentication required".to_string(),
        }),
    )
}
