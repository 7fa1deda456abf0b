//! Session management for authenticated users.
//!
//! Implements the [`SessionIssuer`] collaborator over Redis: opaque UUID
//! tokens with a fixed lifetime, validated by direct key lookup.

use anyhow::{Context, Result};
use redis::aio::MultiplexedConnection;
use redis::{AsyncCommands, Client};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use uuid::Uuid;

use crate::domain::SessionIssuer;

// ---

/// Session data stored in Redis.
#[derive(Debug, Serialize, Deserialize)]
struct SessionData {
    //
    identifier: String,
    expires_at: i64,
}

/// Identity recovered from a validated session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionInfo {
    //
    pub identifier: String,
}

// ---

/// Redis-backed session issuer with a fixed token lifetime.
pub struct RedisSessionIssuer {
    // ---
    client: Client,
    ttl: Duration,
}

impl RedisSessionIssuer {
    // ---
    pub fn new(client: Client, ttl: Duration) -> Self {
        // ---
        Self { client, ttl }
    }
}

#[async_trait::async_trait]
impl SessionIssuer for RedisSessionIssuer {
    // ---
    async fn issue(&self, identifier: &str) -> Result<String> {
        // ---
        let mut conn = self
            .client
            .get_multiplexed_async_connection()
            .await
            .context("failed to connect to Redis for session issuance")?;

        let token = Uuid::new_v4().to_string();
        let expires_at = chrono::Utc::now().timestamp() + self.ttl.as_secs() as i64;

        let session_data = SessionData {
            //
            identifier: identifier.to_string(),
            expires_at,
        };

        let session_json =
            serde_json::to_string(&session_data).context("failed to serialize session data")?;

        let redis_key = format!("session:{token}");

        conn.set_ex::<_, _, ()>(&redis_key, session_json, self.ttl.as_secs())
            .await
            .context("failed to store session in Redis")?;

        tracing::info!("Created session for user: {}", identifier);

        Ok(token)
    }
}

/// Looks up a bearer token and returns the bound identity, or `None` if
/// the token is unknown or expired.
pub async fn validate_session(
    redis_conn: &mut MultiplexedConnection,
    token: &str,
) -> Result<Option<SessionInfo>> {
    //
    let redis_key = format!("session:{token}");

    let session_json: Option<String> = redis_conn
        .get(&redis_key)
        .await
        .context("failed to read session from Redis")?;

    let Some(session_json) = session_json else {
        return Ok(None);
    };

    let data: SessionData =
        serde_json::from_str(&session_json).context("failed to deserialize session data")?;

    // Redis TTL already bounds the key lifetime; the embedded timestamp is
    // the authoritative check in case the key outlives it.
    if data.expires_at < chrono::Utc::now().timestamp() {
        return Ok(None);
    }

    Ok(Some(SessionInfo {
        identifier: data.identifier,
    }))
}
