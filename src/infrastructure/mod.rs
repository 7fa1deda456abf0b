mod database;
mod email;
pub mod metrics;

// Re-export the factory functions for easy access
pub use database::{create_postgres_store, init_database_with_retry_from_env};
pub use email::{create_console_mailer, create_smtp_mailer};
pub use metrics::{create_noop_metrics, create_prom_metrics};
