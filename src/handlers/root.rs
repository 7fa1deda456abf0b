use axum::response::IntoResponse;

pub async fn root_handler() -> impl IntoResponse {
    let version = env!("CARGO_PKG_VERSION");
    format!(
        r#"Welcome to the Login API 👋
Version: {version}

Available endpoints:
  - POST /auth/signup          - Create an account
  - POST /auth/login           - Log in (Chrome logins require an emailed OTP)
  - POST /auth/forgot-password - Request a generated replacement password
  - GET  /auth/login-history   - Login history for the bearer token's account
  - GET  /health               - Light health check
  - GET  /health?mode=full     - Full health check (includes Redis)
  - GET  /metrics              - Prometheus metrics

Mobile logins are accepted between 10:00 and 13:00 local time only.
"#
    )
}
