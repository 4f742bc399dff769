use thiserror::Error;

/// Typed failures for the two external legs: secret store access and the
/// OAuth2 token exchange. The resolver decides explicitly which of these
/// justify the environment-variable fallback; nothing is swallowed.
#[derive(Debug, Error)]
pub enum IssuerError {
    #[error("secret store authentication failed: {0}")]
    SecretStoreAuth(String),

    #[error("secret store unavailable: {0}")]
    SecretStoreUnavailable(String),

    #[error("secret '{name}' not found in store")]
    SecretNotFound { name: String },

    #[error("credential missing: environment variable '{var}' is unset or empty")]
    MissingCredential { var: String },

    #[error("token endpoint unreachable: {0}")]
    TokenEndpointUnreachable(String),

    #[error("token endpoint rejected the exchange: HTTP {status}: {body}")]
    TokenEndpointRejected { status: u16, body: String },

    #[error("malformed token response: {0}")]
    MalformedTokenResponse(String),
}

impl IssuerError {
    /// Transient errors are worth retrying with backoff. Auth failures,
    /// missing secrets and 4xx rejections are fatal.
    pub fn is_transient(&self) -> bool {
        match self {
            IssuerError::SecretStoreUnavailable(_)
            | IssuerError::TokenEndpointUnreachable(_) => true,
            IssuerError::TokenEndpointRejected { status, .. } => *status >= 500,
            _ => false,
        }
    }
}
