use std::sync::Arc;

use anyhow::Result;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::any;
use axum::{Json, Router};
use http::StatusCode;
use tracing::{error, info};

use crate::config::settings::SettingsConfig;
use crate::exchange::oauth2::TokenExchanger;
use crate::secrets::resolver::CredentialResolver;

#[derive(Clone)]
pub struct AppState {
    pub resolver: Arc<CredentialResolver>,
    pub exchanger: Arc<TokenExchanger>,
}

impl AppState {
    pub fn new(resolver: CredentialResolver, exchanger: TokenExchanger) -> Self {
        Self {
            resolver: Arc::new(resolver),
            exchanger: Arc::new(exchanger),
        }
    }
}

pub fn router(state: AppState) -> Router {
    // Any method triggers issuance; the request content is unused.
    Router::new()
        .route("/api/token", any(issue_token))
        .with_state(state)
}

/// Start one Axum server serving the token trigger.
pub async fn start(settings_config: &SettingsConfig, state: AppState) -> Result<()> {
    let app = router(state);

    let bind_addr = &settings_config.server.host;
    let port = &settings_config.server.port;
    info!("address: {}, port: {}", bind_addr, port);
    let listener = tokio::net::TcpListener::bind(format!("{}:{}", bind_addr, port)).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Terminal states only: 200 with the token payload, or 500 with the typed
/// error rendered as text. No retries at this layer.
async fn issue_token(State(state): State<AppState>) -> impl IntoResponse {
    let credentials = match state.resolver.resolve().await {
        Ok(credentials) => credentials,
        Err(e) => {
            error!("credential resolution failed: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response();
        }
    };

    match state.exchanger.fetch_token(&credentials).await {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(e) => {
            error!("token exchange failed: {e}");
            (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()).into_response()
        }
    }
}
