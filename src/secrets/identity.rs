use std::env;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::IssuerError;

/// Instance metadata service, reachable from any Azure VM or container.
pub const IMDS_TOKEN_URL: &str = "http://169.254.169.254/metadata/identity/oauth2/token";

const IMDS_API_VERSION: &str = "2018-02-01";
const IDENTITY_ENDPOINT_API_VERSION: &str = "2019-08-01";

/// Ambient platform identity. Resolves an AAD access token for a target
/// resource either through the App Service identity endpoint
/// (IDENTITY_ENDPOINT + IDENTITY_HEADER) or, absent those, through IMDS.
#[derive(Debug, Clone)]
pub struct ManagedIdentity {
    pub client: Client,
    pub resource: String,
}

#[derive(Debug, Deserialize)]
struct IdentityTokenResponse {
    access_token: String,
}

impl ManagedIdentity {
    pub fn new(client: Client, resource: impl Into<String>) -> Self {
        Self {
            client,
            resource: resource.into(),
        }
    }

    pub async fn access_token(&self) -> Result<String, IssuerError> {
        let request = match (env::var("IDENTITY_ENDPOINT"), env::var("IDENTITY_HEADER")) {
            (Ok(endpoint), Ok(header)) => self
                .client
                .get(&endpoint)
                .header("X-IDENTITY-HEADER", header)
                .query(&[
                    ("api-version", IDENTITY_ENDPOINT_API_VERSION),
                    ("resource", self.resource.as_str()),
                ]),
            _ => self
                .client
                .get(IMDS_TOKEN_URL)
                .header("Metadata", "true")
                .query(&[
                    ("api-version", IMDS_API_VERSION),
                    ("resource", self.resource.as_str()),
                ]),
        };

        let response = request
            .send()
            .await
            .map_err(|e| IssuerError::SecretStoreAuth(format!("identity endpoint: {e}")))?;
        if !response.status().is_success() {
            return Err(IssuerError::SecretStoreAuth(format!(
                "identity endpoint returned {}",
                response.status()
            )));
        }

        let token: IdentityTokenResponse = response
            .json()
            .await
            .map_err(|e| IssuerError::SecretStoreAuth(format!("identity token parse: {e}")))?;
        debug!("acquired managed identity token for {}", self.resource);
        Ok(token.access_token)
    }
}
