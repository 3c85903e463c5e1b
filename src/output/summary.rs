use crate::workflow::{RunReport, StageOutcome};

/// Terminal view of a finished run: numbered results, then the final reflection
pub fn render_summary(report: &RunReport) -> String {
    let state = &report.final_state;
    let mut out = String::new();

    out.push_str("\n=== Sub-Task Results ===\n\n");

    let tasks: Vec<&str> = report
        .trace
        .iter()
        .filter_map(|r| match &r.outcome {
            StageOutcome::Executed { task } => Some(task.as_str()),
            _ => None,
        })
        .collect();

    if state.results.is_empty() {
        out.push_str("(no sub-tasks were executed)\n");
    }
    for (idx, result) in state.results.iter().enumerate() {
        let task = tasks.get(idx).copied().unwrap_or("");
        out.push_str(&format!("Task {}: {}\n", idx + 1, task));
        for line in result.lines() {
            out.push_str(&format!("    {}\n", line));
        }
        out.push('\n');
    }

    out.push_str("=== Final Reflection ===\n\n");
    out.push_str(&format!("{}\n\n", state.feedback));

    out.push_str(&format!(
        "{} rounds, {} results, {} left unexecuted ({:.1}s via {})\n",
        state.iterations,
        report.executed_count(),
        state.sub_tasks.len(),
        report.total_duration.as_secs_f64(),
        report.backend
    ));

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::report::tests::sample_report;

    #[test]
    fn test_render_summary() {
        let text = render_summary(&sample_report());

        assert!(text.contains("Task 1: Book venue\n    Venue booked for May 5\n"));
        assert!(text.contains("=== Final Reflection ===\n\nCake still missing"));
        assert!(text.contains("1 rounds, 1 results, 1 left unexecuted"));
    }

    #[test]
    fn test_render_summary_without_results() {
        let mut report = sample_report();
        report.final_state.results.clear();

        let text = render_summary(&report);
        assert!(text.contains("(no sub-tasks were executed)"));
    }
}
