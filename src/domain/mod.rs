mod engine;
mod issuer;
mod metrics;
mod models;
mod notifier;
mod outcome;
mod policy;
mod store;

// Publicly expose the Metrics abstraction
pub use metrics::{Metrics, MetricsPtr};

// Collaborator contracts consumed by the engine
pub use issuer::{SessionIssuer, SessionIssuerPtr};
pub use notifier::{Notifier, NotifierPtr};
pub use store::{CredentialStore, CredentialStorePtr};

// Data model and decision flow
pub use engine::{LoginAttempt, OtpEngine};
pub use models::{DeviceHints, DeviceType, LoginEvent, OtpChallenge, UserCredential};
pub use outcome::{Outcome, RejectReason, Restriction};
pub use policy::LoginPolicy;
