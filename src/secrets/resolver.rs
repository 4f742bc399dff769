use std::env;
use std::sync::Arc;

use tracing::{info, warn};

use crate::config::issuer::{EnvFallbackConfig, IssuerConfig};
use crate::config::issuer::{API_KEY_SECRET_DEFAULT, CLIENT_SECRET_SECRET_DEFAULT};
use crate::error::IssuerError;
use crate::resilience::retry::RetrySettings;
use crate::secrets::SecretStore;

/// Resolved client credential pair. Sourced once per invocation, never
/// persisted.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub client_secret: String,
}

/// Resolves credentials from the injected secret store, falling back to the
/// configured environment variables only on a typed store error. Transient
/// store failures are retried with backoff first; the fallback decision is
/// logged, never silent.
pub struct CredentialResolver {
    store: Option<Arc<dyn SecretStore>>,
    retry: RetrySettings,
    api_key_secret: String,
    client_secret_secret: String,
    env: EnvFallbackConfig,
}

impl CredentialResolver {
    pub fn new(
        store: Option<Arc<dyn SecretStore>>,
        retry: RetrySettings,
        cfg: &IssuerConfig,
    ) -> Self {
        let (api_key_secret, client_secret_secret) = cfg
            .vault
            .as_ref()
            .map(|v| (v.api_key_secret.clone(), v.client_secret_secret.clone()))
            .unwrap_or_else(|| {
                (
                    API_KEY_SECRET_DEFAULT.to_string(),
                    CLIENT_SECRET_SECRET_DEFAULT.to_string(),
                )
            });
        Self {
            store,
            retry,
            api_key_secret,
            client_secret_secret,
            env: cfg.env.clone(),
        }
    }

    pub async fn resolve(&self) -> Result<Credentials, IssuerError> {
        match &self.store {
            Some(store) => {
                // transient store errors get the backoff treatment before
                // the fallback is even considered
                let fetched = self
                    .retry
                    .run_with_retry(|| self.from_store(store.as_ref()))
                    .await;
                match fetched {
                    Ok(credentials) => return Ok(credentials),
                    Err(e) => {
                        warn!("secret store failed ({e}); falling back to environment variables");
                    }
                }
            }
            None => info!("no secret store configured; using environment variables"),
        }
        self.from_env()
    }

    async fn from_store(&self, store: &dyn SecretStore) -> Result<Credentials, IssuerError> {
        let api_key = store.get_secret(&self.api_key_secret).await?;
        let client_secret = store.get_secret(&self.client_secret_secret).await?;

        // invariant: credentials are non-empty before any exchange
        if api_key.is_empty() {
            return Err(IssuerError::SecretNotFound {
                name: self.api_key_secret.clone(),
            });
        }
        if client_secret.is_empty() {
            return Err(IssuerError::SecretNotFound {
                name: self.client_secret_secret.clone(),
            });
        }
        info!("resolved credentials from secret store");
        Ok(Credentials {
            api_key,
            client_secret,
        })
    }

    fn from_env(&self) -> Result<Credentials, IssuerError> {
        let api_key = read_env(&self.env.api_key_var)?;
        let client_secret = read_env(&self.env.client_secret_var)?;
        info!(
            "resolved credentials from environment variables {}/{}",
            self.env.api_key_var, self.env.client_secret_var
        );
        Ok(Credentials {
            api_key,
            client_secret,
        })
    }
}

fn read_env(var: &str) -> Result<String, IssuerError> {
    match env::var(var) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(IssuerError::MissingCredential {
            var: var.to_string(),
        }),
    }
}
