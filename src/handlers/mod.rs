// Gateway module - controls public API for handlers
// Modules are private, only exported symbols are public

mod health;
mod login;
mod login_history;
mod metrics;
mod password_reset;
mod root;
mod shared_types;
mod signup;

// Core handlers
pub use health::health_check;
pub use metrics::metrics_handler;
pub use root::root_handler;

// Auth flow handlers
pub use login::login;
pub use login_history::login_history;
pub use password_reset::forgot_password;
pub use signup::signup;
