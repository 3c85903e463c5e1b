use super::{command_for, Backend};
use crate::error::ProviderError;
use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;
use tokio::time::timeout as tokio_timeout;
use tracing::debug;

pub struct ClaudeBackend {
    pub binary: PathBuf,
    pub model: String,
    pub timeout: Duration,
}

#[async_trait]
impl Backend for ClaudeBackend {
    fn name(&self) -> &'static str {
        "claude_cli"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        let mut cmd = command_for(&self.binary);

        // Ensure subscription auth is used (not API key)
        cmd.env_remove("ANTHROPIC_API_KEY");

        cmd.arg("-p")
            .arg(prompt)
            .arg("--model")
            .arg(&self.model)
            .arg("--output-format")
            .arg("json");

        let start = std::time::Instant::now();

        let output = tokio_timeout(self.timeout, cmd.output())
            .await
            .map_err(|_| ProviderError::Timeout(self.timeout))?
            .map_err(ProviderError::Io)?;

        if !output.status.success() {
            return Err(ProviderError::NonZeroExit {
                code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        debug!("claude returned in {:?}", start.elapsed());
        Ok(extract_result(&String::from_utf8_lossy(&output.stdout)))
    }
}

/// Claude wraps the completion in {"result": "...", ...}; anything else is taken verbatim
fn extract_result(stdout: &str) -> String {
    #[derive(serde::Deserialize)]
    struct ClaudeOutput {
        result: String,
    }

    match serde_json::from_str::<ClaudeOutput>(stdout) {
        Ok(out) => out.result,
        Err(_) => stdout.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_result_json() {
        let raw = r#"{"type":"result","result":"1. Book venue","session_id":"abc"}"#;
        assert_eq!(extract_result(raw), "1. Book venue");
    }

    #[test]
    fn test_extract_result_plain_text() {
        assert_eq!(extract_result("just text\n"), "just text\n");
    }
}
