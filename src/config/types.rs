use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use super::defaults::*;

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct Config {
    #[serde(default = "default_version")]
    pub version: u32,

    /// Backend used for every generation call
    #[serde(default)]
    pub provider: Provider,

    #[serde(default)]
    pub providers: ProvidersConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,

    #[serde(default)]
    pub prompts: PromptsConfig,

    #[serde(default)]
    pub retry: RetryConfig,

    /// Per generation call
    #[serde(default = "default_timeout_sec")]
    pub timeout_sec: u64,

    #[serde(default = "default_report_dir")]
    pub report_dir: PathBuf,

    #[serde(default)]
    pub dry_run: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Provider {
    #[default]
    Openai,
    ClaudeCli,
    CodexCli,
    Scripted,
}

impl std::fmt::Display for Provider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Provider::Openai => write!(f, "openai"),
            Provider::ClaudeCli => write!(f, "claude_cli"),
            Provider::CodexCli => write!(f, "codex_cli"),
            Provider::Scripted => write!(f, "scripted"),
        }
    }
}

impl std::str::FromStr for Provider {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "openai" | "groq" => Ok(Provider::Openai),
            "claude_cli" | "claude" => Ok(Provider::ClaudeCli),
            "codex_cli" | "codex" => Ok(Provider::CodexCli),
            "scripted" => Ok(Provider::Scripted),
            _ => Err(format!("Unknown provider: {}", s)),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct ProvidersConfig {
    #[serde(default)]
    pub openai: OpenAiConfig,

    #[serde(default)]
    pub claude_cli: ClaudeCliConfig,

    #[serde(default)]
    pub codex_cli: CodexCliConfig,

    #[serde(default)]
    pub scripted: ScriptedConfig,
}

/// Any OpenAI-compatible chat completion endpoint (Groq by default)
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct OpenAiConfig {
    #[serde(default = "default_openai_base_url")]
    pub base_url: String,

    #[serde(default = "default_openai_model")]
    pub model: String,

    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            base_url: default_openai_base_url(),
            model: default_openai_model(),
            temperature: default_temperature(),
            api_key_env: default_api_key_env(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ClaudeCliConfig {
    #[serde(default = "default_claude_binary")]
    pub binary: PathBuf,

    #[serde(default = "default_claude_model")]
    pub model: String,
}

impl Default for ClaudeCliConfig {
    fn default() -> Self {
        Self {
            binary: default_claude_binary(),
            model: default_claude_model(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct CodexCliConfig {
    #[serde(default = "default_codex_binary")]
    pub binary: PathBuf,

    #[serde(default = "default_codex_model")]
    pub model: String,
}

impl Default for CodexCliConfig {
    fn default() -> Self {
        Self {
            binary: default_codex_binary(),
            model: default_codex_model(),
        }
    }
}

/// Offline backend replaying canned responses from a YAML list
#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct ScriptedConfig {
    #[serde(default = "default_scripted_responses")]
    pub responses_file: PathBuf,
}

impl Default for ScriptedConfig {
    fn default() -> Self {
        Self {
            responses_file: default_scripted_responses(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct WorkflowConfig {
    /// Number of plan/execute/review rounds before the loop terminates
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// How many sub-tasks the planner asks the backend for
    #[serde(default = "default_sub_task_count")]
    pub sub_task_count: usize,

    #[serde(default)]
    pub empty_plan: EmptyPlanPolicy,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_iterations: default_max_iterations(),
            sub_task_count: default_sub_task_count(),
            empty_plan: EmptyPlanPolicy::default(),
        }
    }
}

/// What happens when the planner yields zero sub-tasks
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum EmptyPlanPolicy {
    /// Keep going; the executor no-ops for that round
    #[default]
    Continue,
    /// Abort the run
    Fail,
}

/// Optional prompt template overrides (embedded defaults are used otherwise)
#[derive(Debug, Clone, Default, Deserialize, Serialize, JsonSchema)]
pub struct PromptsConfig {
    #[serde(default)]
    pub plan_file: Option<PathBuf>,

    #[serde(default)]
    pub execute_file: Option<PathBuf>,

    #[serde(default)]
    pub review_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Serialize, JsonSchema)]
pub struct RetryConfig {
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    #[serde(default = "default_backoff_base_ms")]
    pub backoff_base_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_base_ms: default_backoff_base_ms(),
        }
    }
}
