use serde::{Deserialize, Serialize};

/// The single record threaded through every stage of a run.
///
/// Created once per run, mutated in place by whichever stage is active and
/// dropped when the loop terminates. Nothing is persisted across runs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowState {
    /// Set at construction, never changed afterwards
    query: String,

    /// Pending sub-tasks; replaced wholesale by the planner, consumed front-first
    pub sub_tasks: Vec<String>,

    /// Most recently executed sub-task
    pub current_task: String,

    /// One entry per executed sub-task, append-only
    pub results: Vec<String>,

    /// Latest reviewer output
    pub feedback: String,

    /// Number of completed reviews
    pub iterations: u32,
}

impl WorkflowState {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Self::default()
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// All results so far as one newline-separated block
    pub fn joined_results(&self) -> String {
        self.results.join("\n")
    }
}
