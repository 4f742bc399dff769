use std::path::Path;

use anyhow::{anyhow, Result};
use regex::Regex;
use tracing::{debug, error};

use crate::config::issuer::ServiceConfig;
use crate::config::settings::{LogFormat, LoggingConfig};

pub async fn run(config_path: &str) -> Result<ServiceConfig> {
    let path = Path::new(config_path);
    file_to_config(path)
        .await
        .map_err(|e| anyhow!(format!("Invalid config format: {}", e)))
}

/// Load and validate config from YAML file
pub async fn file_to_config(path: &Path) -> Result<ServiceConfig> {
    let content = tokio::fs::read_to_string(path).await?;

    let expanded = expand_env_vars(&content);
    parse_config(expanded)
}

pub fn parse_config(content: String) -> Result<ServiceConfig> {
    let mut service_config: ServiceConfig = serde_yaml::from_str(&content)
        .inspect_err(|e| error!("parse config error: {}", e))?;

    // Apply defaults; LOG_FORMAT can still pick the format when the YAML
    // has no logging section
    if service_config.settings.logging.is_none() {
        service_config.settings.logging = Some(LoggingConfig {
            level: "info".to_owned(),
            format: LogFormat::from_env(),
        });
    }
    if service_config.settings.request_timeout_seconds.is_none() {
        service_config.settings.request_timeout_seconds = Some(10);
    }
    debug!("config loaded: token endpoint {}", service_config.issuer.token_url);

    Ok(service_config)
}

fn expand_env_vars(input: &str) -> String {
    let re = Regex::new(r"\$\{(\w+)(?::([^\}]+))?\}").unwrap();
    re.replace_all(input, |caps: &regex::Captures| {
        let var = &caps[1];
        let default = caps.get(2).map(|m| m.as_str()).unwrap_or("");
        std::env::var(var).unwrap_or_else(|_| default.to_string())
    })
    .to_string()
}
