mod claude;
mod codex;
mod openai;
mod retry;
mod scripted;

pub use claude::ClaudeBackend;
pub use codex::CodexBackend;
pub use openai::OpenAiBackend;
pub use retry::RetryingBackend;
pub use scripted::ScriptedBackend;

use crate::config::{Config, Provider};
use crate::error::ProviderError;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// A text-generation backend: one prompt in, one completion out.
#[async_trait]
pub trait Backend: Send + Sync {
    fn name(&self) -> &'static str;

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError>;
}

/// Create the configured backend, wrapped with the configured retry policy
pub fn create_backend(config: &Config) -> Result<Arc<dyn Backend>, ProviderError> {
    let timeout = Duration::from_secs(config.timeout_sec);

    let inner: Arc<dyn Backend> = match config.provider {
        Provider::Openai => Arc::new(OpenAiBackend::from_config(
            &config.providers.openai,
            timeout,
        )?),
        Provider::ClaudeCli => Arc::new(ClaudeBackend {
            binary: config.providers.claude_cli.binary.clone(),
            model: config.providers.claude_cli.model.clone(),
            timeout,
        }),
        Provider::CodexCli => Arc::new(CodexBackend {
            binary: config.providers.codex_cli.binary.clone(),
            model: config.providers.codex_cli.model.clone(),
            timeout,
        }),
        Provider::Scripted => Arc::new(ScriptedBackend::from_file(
            &config.providers.scripted.responses_file,
        )?),
    };

    Ok(Arc::new(RetryingBackend::new(inner, config.retry.clone())))
}

/// Build a command for `binary`, letting plain names resolve through PATH
pub(crate) fn command_for(binary: &std::path::Path) -> tokio::process::Command {
    let binary_str = binary.to_string_lossy();
    if binary_str.contains('/') || binary_str.contains('\\') {
        tokio::process::Command::new(binary)
    } else {
        tokio::process::Command::new(binary_str.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_create_scripted_backend() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "- one\n- two").unwrap();

        let mut config = Config::default();
        config.provider = Provider::Scripted;
        config.providers.scripted.responses_file = file.path().to_path_buf();

        let backend = create_backend(&config).unwrap();
        assert_eq!(backend.name(), "scripted");
    }

    #[test]
    fn test_create_openai_backend_without_key() {
        let mut config = Config::default();
        config.providers.openai.api_key_env = "AGENTLOOP_TEST_UNSET_KEY".to_string();

        let err = create_backend(&config).err().unwrap();
        assert!(matches!(err, ProviderError::MissingApiKey(ref var) if var == "AGENTLOOP_TEST_UNSET_KEY"));
    }
}
