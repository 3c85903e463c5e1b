use crate::cli::{read_query, resolve_config, RunArgs};
use crate::config::Config;
use crate::output::{render_summary, write_run_report};
use crate::provider::create_backend;
use crate::workflow::{PromptSet, Workflow};
use anyhow::Context;
use chrono::Local;
use tracing::{info, warn};

pub async fn execute(args: RunArgs) -> anyhow::Result<()> {
    let mut config = resolve_config(&args.config)?;

    // Apply run-specific overrides
    if let Some(max_iterations) = args.max_iterations {
        config.workflow.max_iterations = max_iterations;
    }
    if let Some(report_dir) = args.report_dir {
        config.report_dir = report_dir;
    }
    if args.dry_run {
        config.dry_run = true;
    }

    config.validate()?;
    let query = read_query(args.query)?;

    if config.dry_run {
        info!("DRY RUN - no backend calls will be made");
        let prompts = PromptSet::load(&config.prompts)?;
        print_execution_plan(&config, &prompts, &query);
        return Ok(());
    }

    let backend = create_backend(&config).context("Failed to initialize backend")?;
    let workflow = Workflow::from_config(&config, backend)?;

    let report = workflow.run(&query).await.context("Workflow aborted")?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_summary(&report));
    }

    if !args.no_report {
        // Dated report directory (reports/YYYY-MM-DD/)
        let date_str = Local::now().format("%Y-%m-%d").to_string();
        let report_dir = config.report_dir.join(&date_str);

        match write_run_report(&report_dir, &report) {
            Ok(path) => info!("Wrote report: {}", path.display()),
            Err(e) => warn!("Failed to write report: {}", e),
        }
    }

    Ok(())
}

fn print_execution_plan(config: &Config, prompts: &PromptSet, query: &str) {
    let calls_per_round = 3;
    println!("\n=== Execution Plan ===\n");
    println!("Backend: {}", config.provider);
    println!("Rounds: {}", config.workflow.max_iterations);
    println!("Sub-tasks requested per round: {}", config.workflow.sub_task_count);
    println!("Empty plan policy: {:?}", config.workflow.empty_plan);
    println!("Timeout per call: {}s", config.timeout_sec);
    println!("Attempts per call: {}", config.retry.max_attempts);
    println!(
        "Generation calls: at most {}",
        config.workflow.max_iterations as usize * calls_per_round
    );
    println!("Report dir: {:?}", config.report_dir);

    println!("\nFirst planner prompt:\n");
    for line in prompts
        .render_plan(query, config.workflow.sub_task_count)
        .lines()
    {
        println!("  | {}", line);
    }
    println!();
}
