// src/lib.rs
use anyhow::Result;
use app_state::AppState;
use axum::{
    extract::{MatchedPath, Request, State},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};

use handlers::{health_check, metrics_handler, root_handler};
use redis::Client;
use std::env;
use std::sync::Arc;

// Public exports (visible outside this module)
pub mod device;
pub mod domain;

// Internal-only exports (sibling access within this module)
mod app_state;
mod config;
mod handlers;
mod infrastructure;
mod session;

// Hoist up only the public symbol(s)
pub use session::{validate_session, RedisSessionIssuer, SessionInfo};

pub use config::*;

// Publicly expose the infrastructure creation functions
pub use infrastructure::{
    create_console_mailer, // ---
    create_noop_metrics,
    create_postgres_store,
    create_prom_metrics,
    create_smtp_mailer,
    init_database_with_retry_from_env,
};

/// Build the HTTP router with metrics implementation determined by environment variables.
///
/// The database pool must already be initialized via
/// [`init_database_with_retry_from_env`].
pub fn create_router() -> Result<Router> {
    // ---
    // Load all configuration from environment
    let config = AppConfig::from_env()?;

    // Determine metrics implementation from environment
    let metrics_type = env::var("LOGIN_API_METRICS_TYPE").unwrap_or_else(|_| "noop".to_string());
    let metrics = if metrics_type == "prom" {
        create_prom_metrics()?
    } else {
        create_noop_metrics()?
    };

    tracing_subscriber::fmt::try_init().ok(); // Ignores if already initialized

    // Create infrastructure dependencies
    let redis_client = Client::open(config.redis.url.clone())?;
    let store = create_postgres_store()?;
    let mailer = match config.smtp {
        Some(smtp) => create_smtp_mailer(smtp)?,
        None => create_console_mailer()?,
    };
    let sessions = Arc::new(RedisSessionIssuer::new(
        redis_client.clone(),
        config.redis.session_ttl,
    ));

    // Wire the engine with its collaborators
    let engine = domain::OtpEngine::new(store.clone(), mailer, sessions, config.policy);

    // Build application state with all dependencies
    let app_state = AppState::new(redis_client, metrics, store, engine);

    let router = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .nest(
            "/auth",
            Router::new()
                .route("/signup", post(handlers::signup))
                .route("/login", post(handlers::login))
                .route("/forgot-password", post(handlers::forgot_password))
                .route("/login-history", get(handlers::login_history)),
        )
        .layer(middleware::from_fn_with_state(
            app_state.clone(),
            track_http_metrics,
        ))
        .with_state(app_state);

    Ok(router)
}

/// Records duration and status for every request passing through the router.
async fn track_http_metrics(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    // ---
    let start = std::time::Instant::now();

    // Prefer the route template over the raw path to keep label cardinality low.
    let path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| req.uri().path().to_owned());
    let method = req.method().clone();

    let response = next.run(req).await;

    state
        .metrics()
        .record_http_request(start, &path, method.as_str(), response.status().as_u16());

    response
}
