use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::arg;
use clap::command;
use clap::Parser;
use reqwest::Client;
use tracing::info;

use token_issuer::config::loader;
use token_issuer::exchange::oauth2::TokenExchanger;
use token_issuer::resilience::retry::RetrySettings;
use token_issuer::secrets::identity::ManagedIdentity;
use token_issuer::secrets::resolver::CredentialResolver;
use token_issuer::secrets::vault::{KeyVaultStore, VAULT_RESOURCE};
use token_issuer::secrets::SecretStore;
use token_issuer::server::server::{self, AppState};
use token_issuer::utils::logging;
use token_issuer::utils::logging::LogLevel;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, env = "CONFIG", default_value = "token-issuer.yaml")]
    config: String,
    #[arg(long, env = "LOG_LEVEL", value_enum)]
    log_level: Option<LogLevel>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // -------------------------------
    // 1. Read args, load YAML config, init logging
    // -------------------------------

    let args = Args::parse();
    let service_config = loader::run(&args.config).await?;
    logging::run(&service_config, args.log_level).await?;

    // -------------------------------
    // 2. Create request client
    //
    // shared by identity, vault and exchange calls; every outbound
    // request is bounded by the configured timeout
    // -------------------------------

    let timeout = service_config.settings.request_timeout_seconds.unwrap_or(10);
    let client = Client::builder()
        .timeout(Duration::from_secs(timeout))
        .build()?;

    // -------------------------------
    // 3. Wire credential resolver (vault + env fallback)
    //
    // the retry policy is shared: transient store and exchange
    // failures both back off the same way
    // -------------------------------

    let retry = RetrySettings::from_config(service_config.settings.retry.as_ref());
    let store: Option<Arc<dyn SecretStore>> = service_config.issuer.vault.as_ref().map(|vault_cfg| {
        let identity = ManagedIdentity::new(client.clone(), VAULT_RESOURCE);
        Arc::new(KeyVaultStore::new(client.clone(), identity, vault_cfg)) as Arc<dyn SecretStore>
    });
    let resolver = CredentialResolver::new(store, retry.clone(), &service_config.issuer);

    // -------------------------------
    // 4. Wire token exchanger with retry/backoff
    // -------------------------------

    let exchanger = TokenExchanger::new(
        client,
        service_config.issuer.token_url.clone(),
        retry,
    );

    // -------------------------------
    // 5. Start http server with the token trigger
    // -------------------------------

    info!("Service starting...");
    server::start(&service_config.settings, AppState::new(resolver, exchanger)).await?;

    Ok(())
}
