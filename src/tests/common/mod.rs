// tests/common/mod.rs
pub use axum::Router;
pub use tokio::task::JoinHandle;

use std::net::SocketAddr;

use async_trait::async_trait;
use reqwest::Client;

use crate::config::issuer::{EnvFallbackConfig, IssuerConfig, TOKEN_URL_DEFAULT};
use crate::error::IssuerError;
use crate::secrets::SecretStore;

/// Spawn an Axum router on an ephemeral port and return (JoinHandle, SocketAddr)
pub async fn spawn_axum(router: Router) -> (JoinHandle<()>, SocketAddr) {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.expect("bind failed");
    let addr = listener.local_addr().unwrap();
    let handle = tokio::spawn(async move {
        axum::serve(listener, router).await.expect("server failed");
    });
    (handle, addr)
}

pub fn build_reqwest_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(5))
        .build()
        .expect("reqwest client")
}

/// Issuer config with no vault and test-controlled fallback variables.
pub fn env_only_issuer_config(api_key_var: &str, client_secret_var: &str) -> IssuerConfig {
    IssuerConfig {
        token_url: TOKEN_URL_DEFAULT.to_string(),
        vault: None,
        env: EnvFallbackConfig {
            api_key_var: api_key_var.to_string(),
            client_secret_var: client_secret_var.to_string(),
        },
    }
}

/// In-memory store answering the two well-known secret names.
pub struct StubStore {
    pub api_key: String,
    pub client_secret: String,
}

#[async_trait]
impl SecretStore for StubStore {
    async fn get_secret(&self, name: &str) -> Result<String, IssuerError> {
        match name {
            "project-api-key" => Ok(self.api_key.clone()),
            "client-secret" => Ok(self.client_secret.clone()),
            other => Err(IssuerError::SecretNotFound {
                name: other.to_string(),
            }),
        }
    }
}

/// Store whose transport fails a fixed number of times before answering
/// like [`StubStore`].
pub struct FlakyStore {
    pub api_key: String,
    pub client_secret: String,
    pub failures_left: std::sync::atomic::AtomicUsize,
}

#[async_trait]
impl SecretStore for FlakyStore {
    async fn get_secret(&self, name: &str) -> Result<String, IssuerError> {
        use std::sync::atomic::Ordering;
        if self.failures_left.load(Ordering::SeqCst) > 0 {
            self.failures_left.fetch_sub(1, Ordering::SeqCst);
            return Err(IssuerError::SecretStoreUnavailable(
                "connection reset".to_string(),
            ));
        }
        match name {
            "project-api-key" => Ok(self.api_key.clone()),
            "client-secret" => Ok(self.client_secret.clone()),
            other => Err(IssuerError::SecretNotFound {
                name: other.to_string(),
            }),
        }
    }
}

/// Store whose transport always fails.
pub struct DownStore;

#[async_trait]
impl SecretStore for DownStore {
    async fn get_secret(&self, _name: &str) -> Result<String, IssuerError> {
        Err(IssuerError::SecretStoreUnavailable(
            "connection refused".to_string(),
        ))
    }
}
