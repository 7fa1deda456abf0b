use anyhow::Result;
use std::sync::Arc;

use super::models::UserCredential;

/// Abstraction for credential persistence.
///
/// The engine never caches a record across requests: every attempt reads
/// through `find_by_identifier` and writes back the whole record through
/// `save`. No partial-field update operation is assumed.
#[async_trait::async_trait]
pub trait CredentialStore: Send + Sync {
    // ---
    /// Look up a user by email or phone, whichever matches.
    async fn find_by_identifier(&self, identifier: &str) -> Result<Option<UserCredential>>;

    /// Create a new user record. Fails if the email is already taken.
    async fn create(&self, user: UserCredential) -> Result<()>;

    /// Whole-record upsert. Caller supplies the full record.
    async fn save(&self, user: &UserCredential) -> Result<()>;
}

/// Type alias for any backend that implements CredentialStore.
pub type CredentialStorePtr = Arc<dyn CredentialStore>;
