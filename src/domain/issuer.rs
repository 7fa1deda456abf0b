use anyhow::Result;
use std::sync::Arc;

/// Abstraction for minting opaque bearer tokens.
///
/// The token is bound to the user identity with a fixed lifetime
/// understood only by the issuer/verifier pair; the engine treats it
/// as an opaque string.
#[async_trait::async_trait]
pub trait SessionIssuer: Send + Sync {
    // ---
    async fn issue(&self, identifier: &str) -> Result<String>;
}

/// Type alias for any backend that implements SessionIssuer.
pub type SessionIssuerPtr = Arc<dyn SessionIssuer>;
