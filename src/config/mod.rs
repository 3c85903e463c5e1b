mod defaults;
mod types;

pub use types::*;

use crate::error::ConfigError;
use defaults::*;
use std::path::Path;

pub const DEFAULT_CONFIG_FILE: &str = "agentloop.yaml";

impl Default for Config {
    fn default() -> Self {
        Self {
            version: default_version(),
            provider: Provider::default(),
            providers: ProvidersConfig::default(),
            workflow: WorkflowConfig::default(),
            prompts: PromptsConfig::default(),
            retry: RetryConfig::default(),
            timeout_sec: default_timeout_sec(),
            report_dir: default_report_dir(),
            dry_run: false,
        }
    }
}

impl Config {
    /// Load config from a YAML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        let config: Config = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load config, falling back to defaults when the default file is absent.
    ///
    /// An explicitly named file that doesn't exist is still an error.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() && path == Path::new(DEFAULT_CONFIG_FILE) {
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Validate the config
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.workflow.max_iterations == 0 {
            return Err(ConfigError::Invalid {
                field: "workflow.max_iterations",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.workflow.sub_task_count == 0 {
            return Err(ConfigError::Invalid {
                field: "workflow.sub_task_count",
                reason: "must be at least 1".to_string(),
            });
        }

        if self.retry.max_attempts == 0 {
            return Err(ConfigError::Invalid {
                field: "retry.max_attempts",
                reason: "must be at least 1".to_string(),
            });
        }

        if !(0.0..=2.0).contains(&self.providers.openai.temperature) {
            return Err(ConfigError::Invalid {
                field: "providers.openai.temperature",
                reason: format!(
                    "{} is outside the range 0.0..=2.0",
                    self.providers.openai.temperature
                ),
            });
        }

        Ok(())
    }
}
