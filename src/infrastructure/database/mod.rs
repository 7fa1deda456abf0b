//! PostgreSQL-backed credential persistence.
//!
//! Pool initialization retries on startup so the service tolerates the
//! database coming up after it (the common case under docker-compose).
//! The pool lives in a process-wide cell; `create_postgres_store` hands
//! out store instances that share it.

mod postgres_store;

#[cfg(test)]
mod tests;

use anyhow::{anyhow, Result};
use once_cell::sync::OnceCell;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;

use crate::config::DatabaseConfig;
use crate::domain::CredentialStorePtr;
use postgres_store::PostgresCredentialStore;

static POOL: OnceCell<PgPool> = OnceCell::new();

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id                     UUID PRIMARY KEY,
    name                   TEXT NOT NULL,
    email                  TEXT NOT NULL UNIQUE,
    phone                  TEXT,
    secret                 TEXT NOT NULL,
    otp_code               TEXT,
    otp_expires_at         TIMESTAMPTZ,
    last_password_reset_at TIMESTAMPTZ,
    created_at             TIMESTAMPTZ NOT NULL
);

CREATE TABLE IF NOT EXISTS login_events (
    id          BIGSERIAL PRIMARY KEY,
    user_id     UUID NOT NULL REFERENCES users(id),
    ip          TEXT NOT NULL,
    browser     TEXT NOT NULL,
    os          TEXT NOT NULL,
    device_type TEXT NOT NULL,
    occurred_at TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS login_events_user_idx ON login_events (user_id, id);
"#;

/// Connects to PostgreSQL using `DATABASE_URL` and friends, retrying per
/// the configured retry count, then applies the schema.
///
/// Idempotent: subsequent calls return immediately once the pool exists.
/// Must complete before [`create_postgres_store`] is called.
pub async fn init_database_with_retry_from_env() -> Result<()> {
    // ---
    if POOL.get().is_some() {
        return Ok(());
    }

    let config = DatabaseConfig::from_env()?;
    let pool = connect_with_retry(&config).await?;

    sqlx::raw_sql(SCHEMA)
        .execute(&pool)
        .await
        .map_err(|err| anyhow!("failed to apply database schema: {err}"))?;

    // A racing initializer may have won; their pool is equivalent.
    let _ = POOL.set(pool);

    Ok(())
}

async fn connect_with_retry(config: &DatabaseConfig) -> Result<PgPool> {
    // ---
    let mut attempts = 0;

    loop {
        let result = PgPoolOptions::new()
            .min_connections(config.min_connections)
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect(&config.database_url)
            .await;

        match result {
            Ok(pool) => {
                tracing::info!("Connected to PostgreSQL");
                return Ok(pool);
            }
            Err(err) if attempts < config.retry_count => {
                attempts += 1;
                tracing::warn!(
                    attempt = attempts,
                    max = config.retry_count,
                    "database not ready, retrying: {err}"
                );
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            Err(err) => {
                return Err(anyhow!(
                    "failed to connect to database after {} attempts: {err}",
                    config.retry_count
                ));
            }
        }
    }
}

/// Creates a credential store backed by the shared PostgreSQL pool.
///
/// # Errors
/// Fails if [`init_database_with_retry_from_env`] has not run yet.
pub fn create_postgres_store() -> Result<CredentialStorePtr> {
    // ---
    let pool = POOL
        .get()
        .ok_or_else(|| anyhow!("database not initialized; call init_database_with_retry_from_env first"))?
        .clone();

    Ok(Arc::new(PostgresCredentialStore::new(pool)))
}
