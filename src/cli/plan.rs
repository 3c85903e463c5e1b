//! CLI handler for the `plan` subcommand: one planner pass, nothing executed

use crate::cli::{read_query, resolve_config, PlanArgs};
use crate::provider::create_backend;
use crate::workflow::Workflow;
use anyhow::Context;
use tracing::info;

pub async fn execute(args: PlanArgs) -> anyhow::Result<()> {
    let config = resolve_config(&args.config)?;
    config.validate()?;
    let query = read_query(args.query)?;

    let backend = create_backend(&config).context("Failed to initialize backend")?;
    let workflow = Workflow::from_config(&config, backend)?;

    let sub_tasks = workflow.plan_only(&query).await.context("Planning failed")?;
    info!("Planner returned {} sub-tasks", sub_tasks.len());

    if sub_tasks.is_empty() {
        println!("(planner returned no usable sub-tasks)");
    }
    for (idx, task) in sub_tasks.iter().enumerate() {
        println!("{}. {}", idx + 1, task);
    }

    Ok(())
}
