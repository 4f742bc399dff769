/// Secrets module
///
/// Managed-identity authentication, the vault client and the credential
/// resolver that decides between the store and the environment fallback.

pub mod identity;
pub mod resolver;
pub mod vault;

use async_trait::async_trait;

use crate::error::IssuerError;

/// Read-only access to named secrets in a managed store. Injected into the
/// resolver so tests can substitute a stub.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get_secret(&self, name: &str) -> Result<String, IssuerError>;
}
