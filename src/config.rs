// src/config.rs

//! Application configuration loaded from environment variables.
//!
//! This module defines all startup-time configuration for the service.
//! Configuration is validated eagerly and failures are treated as
//! deployment errors rather than recoverable runtime conditions.

use anyhow::Result;
use std::time::Duration;

use crate::domain::LoginPolicy;

// ============================================================
// Local macros (config-only, intentionally explicit)
// ============================================================

/// Reads a required environment variable.
///
/// # Behavior
/// - Fails fast if the variable is missing
/// - Produces a clear, human-readable error message
/// - Intended for startup-time configuration validation
///
/// Missing configuration is treated as a deployment error,
/// not a recoverable runtime condition.
macro_rules! required_env {
    // ---
    ($key:literal) => {
        std::env::var($key)
            .map_err(|_| anyhow::anyhow!(concat!("Missing required configuration: ", $key)))?
    };
}

/// Reads an optional environment variable and attempts to parse it.
///
/// If the variable is missing or cannot be parsed, the provided
/// default value is used. This macro is appropriate for non-critical
/// tuning parameters where fallback behavior is acceptable.
macro_rules! optional_env_parse {
    // ---
    ($key:literal, $ty:ty, $default:expr) => {
        std::env::var($key)
            .ok()
            .and_then(|v| v.parse::<$ty>().ok())
            .unwrap_or($default)
    };
}

#[cfg(test)]
/// Asserts that a configuration constructor fails due to a missing
/// required environment variable.
///
/// This macro is intended for config unit tests only and enforces
/// consistent error messages across failure cases.
macro_rules! assert_missing_config {
    // ---
    ($expr:expr, $key:literal) => {{
        let err = $expr.expect_err("expected configuration error");
        assert!(
            err.to_string()
                .contains(concat!("Missing required configuration: ", $key)),
            "unexpected error: {err}"
        );
    }};
}

// ============================================================
// Public configuration facade
// ============================================================

/// Aggregated application configuration.
///
/// This is the single source of truth for startup configuration.
/// All required configuration is validated eagerly during initialization.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database: database::DatabaseConfig,
    pub redis: redis::RedisConfig,
    /// SMTP delivery settings; when absent, mail is logged instead of sent.
    pub smtp: Option<smtp::SmtpConfig>,
    pub policy: LoginPolicy,
}

impl AppConfig {
    /// Loads and validates all application configuration from the environment.
    ///
    /// # Errors
    /// Returns an error if any required configuration is missing or invalid.
    /// This function is intended to be called exactly once at startup.
    pub fn from_env() -> Result<Self> {
        // ---
        Ok(Self {
            database: database::DatabaseConfig::from_env()?,
            redis: redis::RedisConfig::from_env()?,
            smtp: smtp::SmtpConfig::from_env()?,
            policy: policy::login_policy_from_env(),
        })
    }
}

// ============================================================
// Database configuration
// ============================================================

pub mod database {
    // ---
    use super::*;

    /// Database-related configuration derived from environment variables.
    ///
    /// This configuration is required for the service to function and
    /// is validated eagerly during startup.
    #[derive(Debug, Clone)]
    pub struct DatabaseConfig {
        /// PostgreSQL connection string.
        pub database_url: String,

        /// Number of retry attempts when initializing the database connection. Defaults to 50.
        pub retry_count: u32,

        /// Maximum time to wait when acquiring a connection from the pool. Defaults to 30 seconds.
        pub acquire_timeout: Duration,

        /// Minimum number of connections to keep in the pool, even when idle. Defaults to 2.
        pub min_connections: u32,

        /// Maximum number of connections to be open concurrently. Defaults to 15.
        pub max_connections: u32,
    }

    impl DatabaseConfig {
        /// Builds a [`DatabaseConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if required configuration is missing.
        /// Startup will fail fast rather than continuing with incomplete
        /// or invalid configuration.
        pub fn from_env() -> Result<Self> {
            // ---
            let database_url = required_env!("DATABASE_URL");
            let retry_count = optional_env_parse!("LOGIN_API_DB_RETRY_COUNT", u32, 50);
            let acquire_timeout_secs =
                optional_env_parse!("LOGIN_API_DB_ACQUIRE_TIMEOUT_SEC", u64, 30);
            let min_connections = optional_env_parse!("LOGIN_API_DB_MIN_CONNECTIONS", u32, 2);
            let max_connections = optional_env_parse!("LOGIN_API_DB_MAX_CONNECTIONS", u32, 15);

            Ok(Self {
                database_url,
                retry_count,
                acquire_timeout: Duration::from_secs(acquire_timeout_secs),
                min_connections,
                max_connections,
            })
        }
    }
}
pub use database::DatabaseConfig;

// ============================================================
// Redis configuration
// ============================================================

mod redis {
    // ---
    use super::*;

    /// Redis-related configuration used for session state.
    #[derive(Debug, Clone)]
    pub struct RedisConfig {
        /// Redis connection string.
        pub url: String,

        /// Session token lifetime. Defaults to 1 day.
        pub session_ttl: Duration,
    }

    impl RedisConfig {
        /// Builds a [`RedisConfig`] from environment variables.
        ///
        /// # Errors
        /// Returns an error if required configuration is missing.
        pub fn from_env() -> Result<Self> {
            // ---
            let url = required_env!("REDIS_URL");

            let ttl_secs = optional_env_parse!("LOGIN_API_SESSION_TTL_SEC", u64, 86_400);

            Ok(Self {
                url,
                session_ttl: Duration::from_secs(ttl_secs),
            })
        }
    }
}
pub use redis::RedisConfig;

// ============================================================
// SMTP configuration
// ============================================================

mod smtp {
    // ---
    use super::*;

    /// SMTP relay settings for OTP and password delivery.
    ///
    /// The whole block is optional: without `LOGIN_API_SMTP_HOST` the
    /// service falls back to a log-only mailer, which is the intended
    /// mode for local development and tests. Once a host is configured,
    /// the remaining credentials become required.
    #[derive(Debug, Clone)]
    pub struct SmtpConfig {
        pub host: String,
        pub port: u16,
        pub username: String,
        pub password: String,
        /// Sender address, e.g. `"Internship Portal <no-reply@example.com>"`.
        pub from_address: String,
    }

    impl SmtpConfig {
        /// Builds an [`SmtpConfig`] from environment variables, or `None`
        /// if no SMTP host is configured.
        ///
        /// # Errors
        /// Returns an error if a host is set but credentials are missing.
        pub fn from_env() -> Result<Option<Self>> {
            // ---
            let Ok(host) = std::env::var("LOGIN_API_SMTP_HOST") else {
                return Ok(None);
            };

            let port = optional_env_parse!("LOGIN_API_SMTP_PORT", u16, 587);
            let username = required_env!("LOGIN_API_SMTP_USERNAME");
            let password = required_env!("LOGIN_API_SMTP_PASSWORD");
            let from_address = required_env!("LOGIN_API_SMTP_FROM");

            Ok(Some(Self {
                host,
                port,
                username,
                password,
                from_address,
            }))
        }
    }
}
pub use smtp::SmtpConfig;

// ============================================================
// Login policy configuration
// ============================================================

mod policy {
    // ---
    use super::*;

    /// Builds the [`LoginPolicy`] from environment variables.
    ///
    /// Every knob has a default (5-minute OTP, 10:00-13:00 mobile
    /// window, 24-hour reset cooldown), so nothing here is required
    /// and this cannot fail.
    pub fn login_policy_from_env() -> LoginPolicy {
        // ---
        let defaults = LoginPolicy::default();

        let otp_ttl_secs =
            optional_env_parse!("LOGIN_API_OTP_TTL_SEC", u64, defaults.otp_ttl.as_secs());
        let window_start =
            optional_env_parse!("LOGIN_API_MOBILE_WINDOW_START", u32, defaults.mobile_window_start);
        let window_end =
            optional_env_parse!("LOGIN_API_MOBILE_WINDOW_END", u32, defaults.mobile_window_end);
        let cooldown_hours = optional_env_parse!(
            "LOGIN_API_RESET_COOLDOWN_HOURS",
            u64,
            defaults.reset_cooldown.as_secs() / 3600
        );

        LoginPolicy {
            otp_ttl: Duration::from_secs(otp_ttl_secs),
            mobile_window_start: window_start,
            mobile_window_end: window_end,
            reset_cooldown: Duration::from_secs(cooldown_hours * 3600),
        }
    }
}

// ============================================================
// Tests
// ============================================================
