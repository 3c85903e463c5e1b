use serde::Serialize;

use super::StageKind;

/// Position of the run in the Planning → Executing → Reviewing cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Planning,
    Executing,
    Reviewing,
    Terminated,
}

/// Loop controller verdict after a review
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Replan,
    Terminate,
}

/// Trip-count termination: only the number of completed reviews matters.
pub fn decide_next(iterations: u32, max_iterations: u32) -> Decision {
    if iterations >= max_iterations {
        Decision::Terminate
    } else {
        Decision::Replan
    }
}

impl Phase {
    /// Stage that runs in this phase, `None` once terminated
    pub fn stage(self) -> Option<StageKind> {
        match self {
            Phase::Planning => Some(StageKind::Planner),
            Phase::Executing => Some(StageKind::Executor),
            Phase::Reviewing => Some(StageKind::Reviewer),
            Phase::Terminated => None,
        }
    }

    pub fn next(self, iterations: u32, max_iterations: u32) -> Phase {
        match self {
            Phase::Planning => Phase::Executing,
            // Even when the executor had nothing to do
            Phase::Executing => Phase::Reviewing,
            Phase::Reviewing => match decide_next(iterations, max_iterations) {
                Decision::Replan => Phase::Planning,
                Decision::Terminate => Phase::Terminated,
            },
            Phase::Terminated => Phase::Terminated,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decide_next() {
        assert_eq!(decide_next(0, 3), Decision::Replan);
        assert_eq!(decide_next(2, 3), Decision::Replan);
        assert_eq!(decide_next(3, 3), Decision::Terminate);
        assert_eq!(decide_next(7, 3), Decision::Terminate);
        assert_eq!(decide_next(1, 1), Decision::Terminate);
    }

    #[test]
    fn test_fixed_transitions() {
        assert_eq!(Phase::Planning.next(0, 3), Phase::Executing);
        assert_eq!(Phase::Executing.next(0, 3), Phase::Reviewing);
        assert_eq!(Phase::Reviewing.next(1, 3), Phase::Planning);
        assert_eq!(Phase::Reviewing.next(3, 3), Phase::Terminated);
        assert_eq!(Phase::Terminated.next(0, 3), Phase::Terminated);
    }

    #[test]
    fn test_walk_visits_stages_in_order() {
        let mut phase = Phase::Planning;
        let mut iterations = 0;
        let mut visited = Vec::new();

        while let Some(stage) = phase.stage() {
            visited.push(stage);
            if stage == StageKind::Reviewer {
                iterations += 1;
            }
            phase = phase.next(iterations, 2);
        }

        assert_eq!(
            visited,
            vec![
                StageKind::Planner,
                StageKind::Executor,
                StageKind::Reviewer,
                StageKind::Planner,
                StageKind::Executor,
                StageKind::Reviewer,
            ]
        );
    }
}
