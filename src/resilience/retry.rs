use tokio::time::{sleep, Duration};
use tracing::{error, warn};

use crate::config::settings::RetryConfig;
use crate::error::IssuerError;

#[derive(Debug, Clone)]
pub struct RetrySettings {
    pub attempts: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl RetrySettings {
    pub fn from_config(cfg: Option<&RetryConfig>) -> Self {
        Self {
            attempts: cfg.and_then(|c| c.attempts).unwrap_or(3).max(1),
            base_delay_ms: cfg.and_then(|c| c.base_delay_ms).unwrap_or(100),
            max_delay_ms: cfg.and_then(|c| c.max_delay_ms).unwrap_or(2000),
        }
    }

    /// Retries transient errors only; fatal errors return on first sight.
    pub async fn run_with_retry<F, Fut, T>(&self, mut operation: F) -> Result<T, IssuerError>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = Result<T, IssuerError>>,
    {
        let mut delay = self.base_delay_ms;

        for attempt in 1..=self.attempts {
            match operation().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.attempts => {
                    warn!("Attempt {attempt}/{} failed: {e}", self.attempts);
                    sleep(Duration::from_millis(delay)).await;
                    delay = (delay * 2).min(self.max_delay_ms);
                }
                Err(e) => {
                    if attempt > 1 {
                        error!("all {attempt} attempts failed: {e}");
                    }
                    return Err(e);
                }
            }
        }
        unreachable!("Retry loop exhausted unexpectedly")
    }
}
