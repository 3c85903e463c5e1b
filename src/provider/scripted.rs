//! Scripted backend: replays canned responses in order, no network.
//!
//! Serves as the test double for the workflow stages and as an offline
//! provider (`provider: scripted`) fed from a YAML list where each entry is
//! either a response string or `{ error: "..." }` to simulate a failed call.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use serde::Deserialize;

use super::Backend;
use crate::error::ProviderError;

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum ScriptEntry {
    Text(String),
    Failure { error: String },
}

#[derive(Debug, Default)]
pub struct ScriptedBackend {
    responses: Mutex<VecDeque<Result<String, String>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    #[cfg(test)]
    pub fn new<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(|r| Ok(r.into())).collect()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self, ProviderError> {
        let content = std::fs::read_to_string(path).map_err(|e| ProviderError::Script {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let entries: Vec<ScriptEntry> =
            serde_yaml::from_str(&content).map_err(|e| ProviderError::Script {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })?;

        let backend = Self::default();
        for entry in entries {
            match entry {
                ScriptEntry::Text(text) => backend.push_response(text),
                ScriptEntry::Failure { error } => backend.push_failure(error),
            }
        }
        Ok(backend)
    }

    pub fn push_response(&self, response: impl Into<String>) {
        self.lock_responses().push_back(Ok(response.into()));
    }

    /// Queue a failing call
    pub fn push_failure(&self, message: impl Into<String>) {
        self.lock_responses().push_back(Err(message.into()));
    }

    /// Every prompt received so far, in call order
    #[cfg(test)]
    pub fn prompts(&self) -> Vec<String> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    #[cfg(test)]
    pub fn remaining(&self) -> usize {
        self.lock_responses().len()
    }

    fn lock_responses(&self) -> std::sync::MutexGuard<'_, VecDeque<Result<String, String>>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn generate(&self, prompt: &str) -> Result<String, ProviderError> {
        self.prompts
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(prompt.to_string());

        match self.lock_responses().pop_front() {
            Some(Ok(text)) => Ok(text),
            Some(Err(message)) => Err(ProviderError::Api(message)),
            None => Err(ProviderError::ScriptExhausted),
        }
    }
}
