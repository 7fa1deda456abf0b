//! Application state management.
//!
//! This module defines the shared state structure that gets passed to all
//! Axum handlers via the `State` extractor. The `AppState` contains the
//! login engine, metrics implementation, and the Redis client used for
//! session validation.
//!
//! The state is designed to be cheaply cloneable (using `Arc` internally
//! where needed) so it can be passed efficiently to each request handler
//! without expensive copying of resources.

use axum::http::StatusCode;
use redis::Client;

use crate::domain::{CredentialStorePtr, MetricsPtr, OtpEngine};

/// Shared application state passed to all Axum handlers.
///
/// This struct serves as the Dependency Injection container for the
/// application. Handlers depend on abstractions (the engine's collaborator
/// traits), not concrete implementations; the state is built once at
/// startup and never mutated afterwards.
#[derive(Clone)]
pub(crate) struct AppState {
    /// Redis client for creating multiplexed async connections on demand.
    ///
    /// Used for session validation and the full-mode health check.
    redis_client: Client,

    /// Metrics implementation for recording application events.
    ///
    /// Either Prometheus-backed (production) or no-op (testing/development).
    metrics: MetricsPtr,

    /// Credential persistence, used directly by the handlers that sit
    /// outside the engine's decision flow (signup, login history).
    store: CredentialStorePtr,

    /// The login/OTP decision engine with its collaborators wired in.
    engine: OtpEngine,
}

impl AppState {
    // ---

    pub fn new(
        redis_client: Client,
        metrics: MetricsPtr,
        store: CredentialStorePtr,
        engine: OtpEngine,
    ) -> Self {
        // ---
        AppState {
            redis_client,
            metrics,
            store,
            engine,
        }
    }

    /// Creates a new multiplexed Redis connection.
    ///
    /// Logs an error if connection fails and returns HTTP 500.
    pub(crate) async fn get_conn(&self) -> Result<redis::aio::MultiplexedConnection, StatusCode> {
        // ---
        self.redis_client
            .get_multiplexed_async_connection()
            .await
            .map_err(|err| {
                tracing::error!("Failed to connect to Redis: {:?}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            })
    }

    /// Get a reference to the metrics implementation.
    pub(crate) fn metrics(&self) -> &MetricsPtr {
        // ---
        &self.metrics
    }

    /// Get a reference to the credential store.
    pub(crate) fn store(&self) -> &CredentialStorePtr {
        // ---
        &self.store
    }

    /// Get a reference to the login engine.
    pub(crate) fn engine(&self) -> &OtpEngine {
        // ---
        &self.engine
    }
}

#[cfg(test)]
mod tests {
    // ---

    use super::*;
    use crate::domain::{
        CredentialStore, LoginPolicy, Notifier, OtpEngine, SessionIssuer, UserCredential,
    };
    use crate::infrastructure::create_noop_metrics;
    use anyhow::Result;
    use std::sync::Arc;

    // Mock collaborators - not exercised, just satisfy AppState requirements
    struct MockStore;

    #[async_trait::async_trait]
    impl CredentialStore for MockStore {
        // ---

        async fn find_by_identifier(&self, _identifier: &str) -> Result<Option<UserCredential>> {
            unimplemented!("Mock store - not used in AppState unit tests")
        }
        async fn create(&self, _user: UserCredential) -> Result<()> {
            unimplemented!()
        }
        async fn save(&self, _user: &UserCredential) -> Result<()> {
            unimplemented!()
        }
    }

    struct MockNotifier;

    #[async_trait::async_trait]
    impl Notifier for MockNotifier {
        // ---
        async fn send(&self, _to: &str, _subject: &str, _body: &str) -> Result<()> {
            unimplemented!()
        }
    }

    struct MockIssuer;

    #[async_trait::async_trait]
    impl SessionIssuer for MockIssuer {
        // ---
        async fn issue(&self, _identifier: &str) -> Result<String> {
            unimplemented!()
        }
    }

    fn test_engine() -> OtpEngine {
        // ---
        OtpEngine::new(
            Arc::new(MockStore),
            Arc::new(MockNotifier),
            Arc::new(MockIssuer),
            LoginPolicy::default(),
        )
    }

    #[test]
    fn test_app_state_creation_and_clone() {
        // ---
        // Test basic creation and that Clone works
        let redis_client = Client::open("redis://127.0.0.1:6379").unwrap();
        let metrics = create_noop_metrics().unwrap();

        let app_state = AppState::new(redis_client, metrics, Arc::new(MockStore), test_engine());
        let _cloned = app_state.clone();

        // Verify accessors work
        let _metrics_ref = app_state.metrics();
        assert_eq!(app_state.engine().policy().otp_ttl.as_secs(), 300);
    }

    #[tokio::test]
    async fn test_redis_connection_failure() {
        // ---
        // Test that connection failures return proper error
        let redis_client = Client::open("redis://invalid-host:6379").unwrap();
        let metrics = create_noop_metrics().unwrap();

        let app_state = AppState::new(redis_client, metrics, Arc::new(MockStore), test_engine());

        let result = app_state.get_conn().await;
        assert_eq!(result.unwrap_err(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
