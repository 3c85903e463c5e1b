use super::Backend;
use crate::config::RetryConfig;
use crate::error::ProviderError;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::warn;

/// Execute an async operation with jittered exponential backoff
pub async fn retry_with_backoff<F, Fut, T, E>(
    config: &RetryConfig,
    mut operation: F,
) -> Result<T, E>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: std::fmt::Display,
{
    let mut attempts = 0;
    let mut backoff_ms = config.backoff_base_ms;

    loop {
        attempts += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if attempts >= config.max_attempts => {
                if attempts > 1 {
                    warn!("All {} attempts failed: {}", attempts, e);
                }
                return Err(e);
            }
            Err(e) => {
                // Jittered backoff: base * 2^attempt + random(0..base)
                let jitter = if config.backoff_base_ms > 0 {
                    rand::random::<u64>() % config.backoff_base_ms
                } else {
                    0
                };
                let delay = Duration::from_millis(backoff_ms + jitter);

                warn!(
                    "Attempt {} failed: {}. Retrying in {:?}...",
                    attempts, e, delay
                );

                sleep(delay).await;
                backoff_ms = backoff_ms.saturating_mul(2);
            }
        }
    }
}

/// Backend decorator applying the retry policy to every generation call.
///
/// With the default `max_attempts: 1` the first failure is returned as-is, so a
/// failed generation call aborts the run unless retries are configured.
pub struct RetryingBackend {
    inner: Arc<dyn Backend>,
    config: RetryConfig,
}

impl RetryingBackend {
    pub fn new(inner: Arc<dyn Backend>, config: RetryConfig) -> Self {
        Self { inner, config }
    }
}

#[async_trait]
impl Backend for RetryingBackend {
    fn name(&self) -> &'static str {
        self.inner.name()
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        retry_with_backoff(&self.config, || self.inner.generate(prompt)).await
    }
}
