use std::path::PathBuf;
use thiserror::Error;

use crate::workflow::StageKind;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("Failed to read prompt file '{path}': {source}")]
    PromptFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Invalid value for '{field}': {reason}")]
    Invalid { field: &'static str, reason: String },
}

#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Execution timed out after {0:?}")]
    Timeout(std::time::Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Process failed with exit code {code}: {stderr}")]
    NonZeroExit { code: i32, stderr: String },

    #[error("API request failed: {0}")]
    Api(String),

    #[error("Environment variable {0} is not set")]
    MissingApiKey(String),

    #[error("Failed to load scripted responses from '{path}': {reason}")]
    Script { path: PathBuf, reason: String },

    #[error("Scripted backend has no responses left")]
    ScriptExhausted,
}

#[derive(Error, Debug)]
pub enum WorkflowError {
    /// A generation call failed; the run is aborted.
    #[error("{stage} generation call failed: {source}")]
    Backend {
        stage: StageKind,
        #[source]
        source: ProviderError,
    },

    #[error("Planner produced no usable sub-tasks (round {round})")]
    EmptyPlan { round: u32 },
}

#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to create output directory: {0}")]
    CreateDir(std::io::Error),

    #[error("Failed to write report: {0}")]
    WriteReport(std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}
