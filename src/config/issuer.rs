use serde::Deserialize;

use crate::config::settings::SettingsConfig;

/// OS Data Hub token endpoint; overridable via `issuer.token_url`.
pub const TOKEN_URL_DEFAULT: &str = "https://api.os.uk/oauth2/token/v1";

pub const API_KEY_SECRET_DEFAULT: &str = "project-api-key";
pub const CLIENT_SECRET_SECRET_DEFAULT: &str = "client-secret";

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    pub issuer: IssuerConfig,
}

/// ================================
/// Issuer: token endpoint + credential sources
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct IssuerConfig {
    #[serde(default = "default_token_url")]
    pub token_url: String,
    /// Managed secret store. When absent the resolver goes straight to the
    /// environment variables.
    pub vault: Option<VaultConfig>,
    #[serde(default)]
    pub env: EnvFallbackConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct VaultConfig {
    /// Base vault URL, e.g. https://example-kv.vault.azure.net
    pub url: String,
    #[serde(default = "default_vault_api_version")]
    pub api_version: String,
    #[serde(default = "default_api_key_secret")]
    pub api_key_secret: String,
    #[serde(default = "default_client_secret_secret")]
    pub client_secret_secret: String,
}

/// Environment variables consulted when the store fails or is not configured.
#[derive(Debug, Deserialize, Clone)]
pub struct EnvFallbackConfig {
    #[serde(default = "default_api_key_var")]
    pub api_key_var: String,
    #[serde(default = "default_client_secret_var")]
    pub client_secret_var: String,
}

impl Default for EnvFallbackConfig {
    fn default() -> Self {
        Self {
            api_key_var: default_api_key_var(),
            client_secret_var: default_client_secret_var(),
        }
    }
}

fn default_token_url() -> String {
    TOKEN_URL_DEFAULT.to_string()
}

fn default_vault_api_version() -> String {
    "7.4".to_string()
}

fn default_api_key_secret() -> String {
    API_KEY_SECRET_DEFAULT.to_string()
}

fn default_client_secret_secret() -> String {
    CLIENT_SECRET_SECRET_DEFAULT.to_string()
}

fn default_api_key_var() -> String {
    "project_api_key".to_string()
}

fn default_client_secret_var() -> String {
    "client_secret".to_string()
}
