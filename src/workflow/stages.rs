use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::parser::parse_sub_tasks;
use super::prompt::PromptSet;
use super::state::WorkflowState;
use super::StageKind;
use crate::config::EmptyPlanPolicy;
use crate::error::WorkflowError;
use crate::provider::Backend;

/// What a single stage invocation did to the state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StageOutcome {
    Planned { sub_tasks: usize },
    Executed { task: String },
    /// Executor found no pending sub-task; state untouched
    Skipped,
    Reviewed { iterations: u32 },
}

/// One node of the loop. Each stage owns the state only for the duration of `run`.
#[async_trait]
pub trait Stage: Send + Sync {
    fn kind(&self) -> StageKind;

    async fn run(&self, state: &mut WorkflowState) -> Result<StageOutcome, WorkflowError>;
}

/// Splits the query into a fresh list of sub-tasks
pub struct Planner {
    backend: Arc<dyn Backend>,
    prompts: Arc<PromptSet>,
    sub_task_count: usize,
    empty_plan: EmptyPlanPolicy,
}

impl Planner {
    pub fn new(
        backend: Arc<dyn Backend>,
        prompts: Arc<PromptSet>,
        sub_task_count: usize,
        empty_plan: EmptyPlanPolicy,
    ) -> Self {
        Self {
            backend,
            prompts,
            sub_task_count,
            empty_plan,
        }
    }
}

#[async_trait]
impl Stage for Planner {
    fn kind(&self) -> StageKind {
        StageKind::Planner
    }

    async fn run(&self, state: &mut WorkflowState) -> Result<StageOutcome, WorkflowError> {
        let prompt = self.prompts.render_plan(state.query(), self.sub_task_count);

        let raw = self
            .backend
            .generate(&prompt)
            .await
            .map_err(|source| WorkflowError::Backend {
                stage: StageKind::Planner,
                source,
            })?;

        let sub_tasks = parse_sub_tasks(&raw);
        debug!("Planner parsed {} sub-tasks: {:?}", sub_tasks.len(), sub_tasks);

        if sub_tasks.len() != self.sub_task_count {
            warn!(
                "Planner asked for {} sub-tasks but got {}",
                self.sub_task_count,
                sub_tasks.len()
            );
        }

        if sub_tasks.is_empty() && self.empty_plan == EmptyPlanPolicy::Fail {
            return Err(WorkflowError::EmptyPlan {
                round: state.iterations + 1,
            });
        }

        // Leftovers from the previous round are dropped, not merged
        state.sub_tasks = sub_tasks;

        Ok(StageOutcome::Planned {
            sub_tasks: state.sub_tasks.len(),
        })
    }
}

/// Runs the first pending sub-task
pub struct Executor {
    backend: Arc<dyn Backend>,
    prompts: Arc<PromptSet>,
}

impl Executor {
    pub fn new(backend: Arc<dyn Backend>, prompts: Arc<PromptSet>) -> Self {
        Self { backend, prompts }
    }
}

#[async_trait]
impl Stage for Executor {
    fn kind(&self) -> StageKind {
        StageKind::Executor
    }

    async fn run(&self, state: &mut WorkflowState) -> Result<StageOutcome, WorkflowError> {
        let Some(task) = state.sub_tasks.first().cloned() else {
            info!("No pending sub-task, skipping execution");
            return Ok(StageOutcome::Skipped);
        };

        info!("Executing: {}", task);
        let result = self
            .backend
            .generate(&self.prompts.render_execute(&task))
            .await
            .map_err(|source| WorkflowError::Backend {
                stage: StageKind::Executor,
                source,
            })?;

        state.sub_tasks.remove(0);
        state.results.push(result.trim().to_string());
        state.current_task = task.clone();

        Ok(StageOutcome::Executed { task })
    }
}

/// Judges the accumulated results and counts the round
pub struct Reviewer {
    backend: Arc<dyn Backend>,
    prompts: Arc<PromptSet>,
}

impl Reviewer {
    pub fn new(backend: Arc<dyn Backend>, prompts: Arc<PromptSet>) -> Self {
        Self { backend, prompts }
    }
}

#[async_trait]
impl Stage for Reviewer {
    fn kind(&self) -> StageKind {
        StageKind::Reviewer
    }

    async fn run(&self, state: &mut WorkflowState) -> Result<StageOutcome, WorkflowError> {
        let prompt = self
            .prompts
            .render_review(state.query(), &state.joined_results());

        let feedback = self
            .backend
            .generate(&prompt)
            .await
            .map_err(|source| WorkflowError::Backend {
                stage: StageKind::Reviewer,
                source,
            })?;

        state.feedback = feedback.trim().to_string();
        state.iterations += 1;

        Ok(StageOutcome::Reviewed {
            iterations: state.iterations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ProviderError;
    use crate::provider::ScriptedBackend;

    fn prompts() -> Arc<PromptSet> {
        Arc::new(PromptSet::default())
    }

    fn planner(backend: Arc<ScriptedBackend>, policy: EmptyPlanPolicy) -> Planner {
        Planner::new(backend, prompts(), 3, policy)
    }

    #[tokio::test]
    async fn test_planner_parses_numbered_response() {
        let backend = Arc::new(ScriptedBackend::new([
            "1. Book venue\n2. Order cake\n3. Send invites\n",
        ]));
        let mut state = WorkflowState::new("Plan a birthday party");

        let outcome = planner(backend.clone(), EmptyPlanPolicy::Continue)
            .run(&mut state)
            .await
            .unwrap();

        assert_eq!(outcome, StageOutcome::Planned { sub_tasks: 3 });
        assert_eq!(state.sub_tasks, vec!["Book venue", "Order cake", "Send invites"]);
        assert!(backend.prompts()[0].contains("Plan a birthday party"));
    }

    #[tokio::test]
    async fn test_planner_replaces_leftover_sub_tasks() {
        let backend = Arc::new(ScriptedBackend::new(["- New one\n- New two"]));
        let mut state = WorkflowState::new("q");
        state.sub_tasks = vec!["Old leftover".to_string()];

        planner(backend, EmptyPlanPolicy::Continue)
            .run(&mut state)
            .await
            .unwrap();

        assert_eq!(state.sub_tasks, vec!["New one", "New two"]);
    }

    #[tokio::test]
    async fn test_planner_empty_plan_policies() {
        let mut state = WorkflowState::new("q");
        let outcome = planner(
            Arc::new(ScriptedBackend::new(["\n  \n"])),
            EmptyPlanPolicy::Continue,
        )
        .run(&mut state)
        .await
        .unwrap();
        assert_eq!(outcome, StageOutcome::Planned { sub_tasks: 0 });
        assert!(state.sub_tasks.is_empty());

        let mut state = WorkflowState::new("q");
        let err = planner(Arc::new(ScriptedBackend::new([""])), EmptyPlanPolicy::Fail)
            .run(&mut state)
            .await
            .unwrap_err();
        assert!(matches!(err, WorkflowError::EmptyPlan { round: 1 }));
    }

    #[tokio::test]
    async fn test_planner_backend_failure() {
        let backend = Arc::new(ScriptedBackend::default());
        backend.push_failure("connection reset");
        let mut state = WorkflowState::new("q");

        let err = planner(backend, EmptyPlanPolicy::Continue)
            .run(&mut state)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Backend {
                stage: StageKind::Planner,
                source: ProviderError::Api(_)
            }
        ));
    }

    #[tokio::test]
    async fn test_executor_pops_first_task() {
        let backend = Arc::new(ScriptedBackend::new(["  Venue booked for May 5\n"]));
        let executor = Executor::new(backend.clone(), prompts());
        let mut state = WorkflowState::new("Plan a birthday party");
        state.sub_tasks = vec!["Book venue".to_string(), "Order cake".to_string()];
        state.results = vec!["earlier".to_string()];

        let outcome = executor.run(&mut state).await.unwrap();

        assert_eq!(
            outcome,
            StageOutcome::Executed {
                task: "Book venue".to_string()
            }
        );
        assert_eq!(state.sub_tasks, vec!["Order cake"]);
        assert_eq!(state.results, vec!["earlier", "Venue booked for May 5"]);
        assert_eq!(state.current_task, "Book venue");
        assert!(backend.prompts()[0].contains("Do this task:\nBook venue"));
    }

    #[tokio::test]
    async fn test_executor_noop_on_empty() {
        let backend = Arc::new(ScriptedBackend::new(["should not be used"]));
        let executor = Executor::new(backend.clone(), prompts());
        let mut state = WorkflowState::new("q");
        state.results = vec!["r1".to_string()];
        state.current_task = "previous".to_string();
        let before = state.clone();

        let outcome = executor.run(&mut state).await.unwrap();

        assert_eq!(outcome, StageOutcome::Skipped);
        assert_eq!(state, before);
        assert_eq!(backend.remaining(), 1);
    }

    #[tokio::test]
    async fn test_executor_failure_leaves_task_pending() {
        let backend = Arc::new(ScriptedBackend::default());
        backend.push_failure("timeout");
        let executor = Executor::new(backend, prompts());
        let mut state = WorkflowState::new("q");
        state.sub_tasks = vec!["Book venue".to_string()];

        let err = executor.run(&mut state).await.unwrap_err();

        assert!(matches!(
            err,
            WorkflowError::Backend {
                stage: StageKind::Executor,
                ..
            }
        ));
        assert_eq!(state.sub_tasks, vec!["Book venue"]);
        assert!(state.results.is_empty());
    }

    #[tokio::test]
    async fn test_reviewer_uses_all_current_results() {
        let backend = Arc::new(ScriptedBackend::new(["  Looks complete.  ", "Still good."]));
        let reviewer = Reviewer::new(backend.clone(), prompts());
        let mut state = WorkflowState::new("Plan a party");
        state.results = vec!["Venue booked".to_string()];

        let outcome = reviewer.run(&mut state).await.unwrap();
        assert_eq!(outcome, StageOutcome::Reviewed { iterations: 1 });
        assert_eq!(state.feedback, "Looks complete.");

        state.results.push("Cake ordered".to_string());
        reviewer.run(&mut state).await.unwrap();
        assert_eq!(state.iterations, 2);
        assert_eq!(state.feedback, "Still good.");

        let prompts = backend.prompts();
        assert!(prompts[1].contains("Venue booked\nCake ordered"));
    }

    #[tokio::test]
    async fn test_reviewer_failure_does_not_count() {
        let backend = Arc::new(ScriptedBackend::default());
        backend.push_failure("boom");
        let reviewer = Reviewer::new(backend, prompts());
        let mut state = WorkflowState::new("q");

        assert!(reviewer.run(&mut state).await.is_err());
        assert_eq!(state.iterations, 0);
    }
}
