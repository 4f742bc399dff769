use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::config::issuer::VaultConfig;
use crate::error::IssuerError;
use crate::secrets::identity::ManagedIdentity;
use crate::secrets::SecretStore;

/// AAD resource for Key Vault data-plane calls.
pub const VAULT_RESOURCE: &str = "https://vault.azure.net";

/// Key Vault REST client authenticated with a managed identity token.
/// One GET per secret; no caching across invocations.
#[derive(Debug, Clone)]
pub struct KeyVaultStore {
    client: Client,
    identity: ManagedIdentity,
    vault_url: String,
    api_version: String,
}

/// Response shape of `GET {vault}/secrets/{name}`; everything but `value`
/// is ignored.
#[derive(Debug, Deserialize)]
struct SecretBundle {
    value: String,
}

impl KeyVaultStore {
    pub fn new(client: Client, identity: ManagedIdentity, cfg: &VaultConfig) -> Self {
        Self {
            client,
            identity,
            vault_url: cfg.url.trim_end_matches('/').to_string(),
            api_version: cfg.api_version.clone(),
        }
    }
}

#[async_trait]
impl SecretStore for KeyVaultStore {
    async fn get_secret(&self, name: &str) -> Result<String, IssuerError> {
        let token = self.identity.access_token().await?;
        let url = format!("{}/secrets/{}", self.vault_url, name);

        let response = self
            .client
            .get(&url)
            .query(&[("api-version", self.api_version.as_str())])
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| IssuerError::SecretStoreUnavailable(e.to_string()))?;

        match response.status() {
            s if s.is_success() => {}
            StatusCode::NOT_FOUND => {
                return Err(IssuerError::SecretNotFound {
                    name: name.to_string(),
                })
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                return Err(IssuerError::SecretStoreAuth(format!(
                    "vault returned {}",
                    response.status()
                )))
            }
            s => return Err(IssuerError::SecretStoreUnavailable(format!("vault returned {s}"))),
        }

        let bundle: SecretBundle = response
            .json()
            .await
            .map_err(|e| IssuerError::SecretStoreUnavailable(format!("secret bundle parse: {e}")))?;
        debug!("fetched secret '{}' from {}", name, self.vault_url);
        Ok(bundle.value)
    }
}
