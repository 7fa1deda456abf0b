use anyhow::Result;
use otp_login_api::{create_router, init_database_with_retry_from_env};
use std::env;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // ---
    // Local development convenience; a missing .env file is fine.
    dotenvy::dotenv().ok();

    // Initialize tracing subscriber to log to stdout
    tracing_subscriber::fmt::try_init().ok();

    info!("Starting Login API server v{}...", env!("CARGO_PKG_VERSION"));

    // Connect to PostgreSQL (with retry) and apply the schema before
    // accepting traffic.
    init_database_with_retry_from_env().await?;

    let app = create_router()?;

    // Get optional bind endpoint from environment
    let endpoint = env::var("API_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    info!("Listening on {}", endpoint);

    let listener = tokio::net::TcpListener::bind(&endpoint).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    // ---
    let _ = tokio::signal::ctrl_c().await;
    info!("Shutdown signal received");
}
