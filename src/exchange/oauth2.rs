use reqwest::Client;
use serde_json::Value;
use tracing::info;

use crate::error::IssuerError;
use crate::resilience::retry::RetrySettings;
use crate::secrets::resolver::Credentials;

/// OAuth2 client-credentials grant against a single token endpoint.
/// Transient failures are retried with backoff; rejections and malformed
/// bodies surface immediately as typed errors.
#[derive(Debug, Clone)]
pub struct TokenExchanger {
    pub client: Client,
    pub token_url: String,
    pub retry: RetrySettings,
}

impl TokenExchanger {
    pub fn new(client: Client, token_url: String, retry: RetrySettings) -> Self {
        Self {
            client,
            token_url,
            retry,
        }
    }

    pub async fn fetch_token(&self, credentials: &Credentials) -> Result<Value, IssuerError> {
        self.retry
            .run_with_retry(|| self.request_token(credentials))
            .await
    }

    async fn request_token(&self, credentials: &Credentials) -> Result<Value, IssuerError> {
        let form = [
            ("grant_type", "client_credentials"),
            ("client_id", credentials.api_key.as_str()),
            ("client_secret", credentials.client_secret.as_str()),
        ];

        let response = self
            .client
            .post(&self.token_url)
            .form(&form)
            .send()
            .await
            .map_err(|e| IssuerError::TokenEndpointUnreachable(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| IssuerError::TokenEndpointUnreachable(e.to_string()))?;
        if !status.is_success() {
            return Err(IssuerError::TokenEndpointRejected {
                status: status.as_u16(),
                body,
            });
        }

        // The payload schema belongs to the remote server; pass it through
        // untouched once access_token is known to be present.
        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| IssuerError::MalformedTokenResponse(e.to_string()))?;
        match payload.get("access_token").and_then(Value::as_str) {
            Some(token) if !token.is_empty() => {}
            _ => {
                return Err(IssuerError::MalformedTokenResponse(
                    "missing access_token field".to_string(),
                ))
            }
        }

        info!("token exchange succeeded against {}", self.token_url);
        Ok(payload)
    }
}
