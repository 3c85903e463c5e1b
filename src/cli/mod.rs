pub mod plan;
pub mod run;
pub mod schema;

use crate::config::{Config, Provider, DEFAULT_CONFIG_FILE};
use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use std::io::Read;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "agentloop")]
#[command(
    author,
    version,
    about = "Iterative plan / execute / review loop over a text-generation backend"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose/debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the full plan / execute / review loop for a query
    Run(RunArgs),

    /// Split a query into sub-tasks without executing them
    Plan(PlanArgs),

    /// Print JSON Schema for config validation
    Schema,
}

/// Settings shared by every command that talks to a backend
#[derive(Args, Clone, Debug)]
pub struct ConfigArgs {
    /// Path to config file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Override backend (openai, claude_cli, codex_cli, scripted)
    #[arg(long, env = "AGENTLOOP_PROVIDER")]
    pub provider: Option<Provider>,

    /// Override the model of the selected backend
    #[arg(long)]
    pub model: Option<String>,

    /// Override number of sub-tasks requested from the planner
    #[arg(long)]
    pub sub_tasks: Option<usize>,
}

#[derive(Parser, Clone)]
pub struct RunArgs {
    /// The query to work on (read from stdin when omitted)
    pub query: Option<String>,

    #[command(flatten)]
    pub config: ConfigArgs,

    /// Override number of rounds before the loop terminates
    #[arg(long)]
    pub max_iterations: Option<u32>,

    /// Override output directory
    #[arg(long)]
    pub report_dir: Option<PathBuf>,

    /// Don't write report files
    #[arg(long)]
    pub no_report: bool,

    /// Print the full run report as JSON instead of the text summary
    #[arg(long)]
    pub json: bool,

    /// Show plan without executing
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Parser, Clone)]
pub struct PlanArgs {
    /// The query to split (read from stdin when omitted)
    pub query: Option<String>,

    #[command(flatten)]
    pub config: ConfigArgs,
}

/// Load config and apply the shared CLI overrides
pub fn resolve_config(args: &ConfigArgs) -> anyhow::Result<Config> {
    info!("Loading config from {:?}", args.config);
    let mut config = Config::load_or_default(&args.config)?;

    if let Some(provider) = args.provider {
        config.provider = provider;
    }
    if let Some(count) = args.sub_tasks {
        config.workflow.sub_task_count = count;
    }
    if let Some(model) = &args.model {
        match config.provider {
            Provider::Openai => config.providers.openai.model = model.clone(),
            Provider::ClaudeCli => config.providers.claude_cli.model = model.clone(),
            Provider::CodexCli => config.providers.codex_cli.model = model.clone(),
            Provider::Scripted => warn!("--model has no effect on the scripted backend"),
        }
    }

    Ok(config)
}

/// Take the query from the argument or stdin; blank queries are rejected
pub fn read_query(arg: Option<String>) -> anyhow::Result<String> {
    let query = match arg {
        Some(q) => q,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read query from stdin")?;
            buf
        }
    };

    if query.trim().is_empty() {
        anyhow::bail!("Please enter a valid query.");
    }
    Ok(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_args(provider: Option<Provider>, model: Option<&str>) -> ConfigArgs {
        ConfigArgs {
            config: PathBuf::from(DEFAULT_CONFIG_FILE),
            provider,
            model: model.map(String::from),
            sub_tasks: Some(5),
        }
    }

    #[test]
    fn test_read_query_rejects_blank() {
        assert!(read_query(Some("   \n".to_string())).is_err());
        assert_eq!(
            read_query(Some("Plan a party".to_string())).unwrap(),
            "Plan a party"
        );
    }

    #[test]
    fn test_resolve_config_overrides() {
        let config =
            resolve_config(&config_args(Some(Provider::CodexCli), Some("o4-mini"))).unwrap();
        assert_eq!(config.provider, Provider::CodexCli);
        assert_eq!(config.providers.codex_cli.model, "o4-mini");
        assert_eq!(config.workflow.sub_task_count, 5);
    }

    #[test]
    fn test_cli_parses_run() {
        let cli = Cli::try_parse_from([
            "agentloop",
            "run",
            "Plan a party",
            "--max-iterations",
            "2",
            "--provider",
            "scripted",
            "--no-report",
        ])
        .unwrap();

        match cli.command {
            Commands::Run(args) => {
                assert_eq!(args.query.as_deref(), Some("Plan a party"));
                assert_eq!(args.max_iterations, Some(2));
                assert_eq!(args.config.provider, Some(Provider::Scripted));
                assert!(args.no_report);
            }
            _ => panic!("expected run"),
        }
    }
}
