//! Drives the plan / execute / review state machine to completion

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use uuid::Uuid;

use super::controller::Phase;
use super::prompt::PromptSet;
use super::stages::{Executor, Planner, Reviewer, Stage, StageOutcome};
use super::state::WorkflowState;
use super::StageKind;
use crate::config::{Config, WorkflowConfig};
use crate::error::{ConfigError, WorkflowError};
use crate::provider::Backend;

/// One stage invocation, in execution order
#[derive(Debug, Clone, Serialize)]
pub struct StageRecord {
    pub round: u32,
    pub stage: StageKind,
    pub outcome: StageOutcome,
    pub duration_ms: u64,
}

/// Everything a completed run produced
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub run_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub backend: String,
    pub initial_state: WorkflowState,
    pub final_state: WorkflowState,
    pub trace: Vec<StageRecord>,
    #[serde(skip)]
    pub total_duration: Duration,
}

impl RunReport {
    /// Rounds that actually executed a sub-task
    pub fn executed_count(&self) -> usize {
        self.trace
            .iter()
            .filter(|r| matches!(r.outcome, StageOutcome::Executed { .. }))
            .count()
    }
}

pub struct Workflow {
    backend_name: &'static str,
    planner: Planner,
    executor: Executor,
    reviewer: Reviewer,
    max_iterations: u32,
}

impl Workflow {
    pub fn new(backend: Arc<dyn Backend>, prompts: PromptSet, settings: &WorkflowConfig) -> Self {
        let prompts = Arc::new(prompts);
        Self {
            backend_name: backend.name(),
            planner: Planner::new(
                backend.clone(),
                prompts.clone(),
                settings.sub_task_count,
                settings.empty_plan,
            ),
            executor: Executor::new(backend.clone(), prompts.clone()),
            reviewer: Reviewer::new(backend, prompts),
            max_iterations: settings.max_iterations,
        }
    }

    /// Build from a loaded config, resolving prompt overrides
    pub fn from_config(config: &Config, backend: Arc<dyn Backend>) -> Result<Self, ConfigError> {
        let prompts = PromptSet::load(&config.prompts)?;
        Ok(Self::new(backend, prompts, &config.workflow))
    }

    fn stage(&self, kind: StageKind) -> &dyn Stage {
        match kind {
            StageKind::Planner => &self.planner,
            StageKind::Executor => &self.executor,
            StageKind::Reviewer => &self.reviewer,
        }
    }

    /// Run the loop for `query` until the iteration cap is reached.
    ///
    /// The first failed generation call aborts the run; no partial state is returned.
    pub async fn run(&self, query: &str) -> Result<RunReport, WorkflowError> {
        let run_id = Uuid::new_v4();
        let started_at = Utc::now();
        let start = Instant::now();

        let mut state = WorkflowState::new(query);
        let initial_state = state.clone();
        let mut trace = Vec::new();
        let mut phase = Phase::Planning;

        info!(
            "Run {} started: up to {} rounds via {}",
            run_id, self.max_iterations, self.backend_name
        );

        while let Some(kind) = phase.stage() {
            let round = state.iterations + 1;
            debug!("Round {}: entering {}", round, kind);

            let stage = self.stage(kind);
            let stage_start = Instant::now();
            let outcome = stage.run(&mut state).await?;
            let elapsed = stage_start.elapsed();

            info!("Round {}: {} finished in {:?}", round, stage.kind(), elapsed);
            trace.push(StageRecord {
                round,
                stage: stage.kind(),
                outcome,
                duration_ms: elapsed.as_millis() as u64,
            });

            phase = phase.next(state.iterations, self.max_iterations);
        }

        info!(
            "Run {} terminated after {} rounds, {} results",
            run_id,
            state.iterations,
            state.results.len()
        );

        Ok(RunReport {
            run_id,
            started_at,
            backend: self.backend_name.to_string(),
            initial_state,
            final_state: state,
            trace,
            total_duration: start.elapsed(),
        })
    }

    /// A single planning pass, without executing or reviewing anything
    pub async fn plan_only(&self, query: &str) -> Result<Vec<String>, WorkflowError> {
        let mut state = WorkflowState::new(query);
        self.planner.run(&mut state).await?;
        Ok(state.sub_tasks)
    }
}
