//! Plan / execute / review loop
//!
//! A fixed three-stage cycle threaded through one `WorkflowState`:
//! 1. Planner splits the query into sub-tasks (one generation call)
//! 2. Executor pops the first sub-task and runs it (one call, or none if the list is empty)
//! 3. Reviewer judges all results so far and bumps the iteration counter (one call)
//!
//! After each review the controller either re-enters planning or terminates,
//! based on the iteration count alone.

pub mod controller;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod stages;
pub mod state;

pub use orchestrator::{RunReport, Workflow};
pub use prompt::PromptSet;
pub use stages::StageOutcome;

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageKind {
    Planner,
    Executor,
    Reviewer,
}

impl std::fmt::Display for StageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StageKind::Planner => write!(f, "Planner"),
            StageKind::Executor => write!(f, "Executor"),
            StageKind::Reviewer => write!(f, "Reviewer"),
        }
    }
}
