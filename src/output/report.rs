use crate::error::OutputError;
use crate::workflow::{RunReport, StageOutcome};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// JSON shape of a written report: the run report plus wall-clock duration
#[derive(Serialize)]
struct ReportFile<'a> {
    #[serde(flatten)]
    report: &'a RunReport,
    duration_sec: f64,
}

/// Write `<run_id>.md` and `<run_id>.json` into `report_dir`, returning the markdown path
pub fn write_run_report(report_dir: &Path, report: &RunReport) -> Result<PathBuf, OutputError> {
    // Ensure directory exists
    fs::create_dir_all(report_dir).map_err(OutputError::CreateDir)?;

    let md_path = report_dir.join(format!("{}.md", report.run_id));
    fs::write(&md_path, build_report_markdown(report)).map_err(OutputError::WriteReport)?;

    // Initial and final state for diagnostics
    let json_path = report_dir.join(format!("{}.json", report.run_id));
    let json = serde_json::to_string_pretty(&ReportFile {
        report,
        duration_sec: report.total_duration.as_secs_f64(),
    })?;
    fs::write(&json_path, json).map_err(OutputError::WriteReport)?;

    Ok(md_path)
}

fn build_report_markdown(report: &RunReport) -> String {
    let state = &report.final_state;
    let mut content = String::new();

    content.push_str("# agentloop run\n\n");

    // Metadata table
    content.push_str("| Metric | Value |\n");
    content.push_str("|--------|-------|\n");
    content.push_str(&format!("| Run | `{}` |\n", report.run_id));
    content.push_str(&format!("| Started | {} |\n", report.started_at.to_rfc3339()));
    content.push_str(&format!("| Backend | {} |\n", report.backend));
    content.push_str(&format!(
        "| Duration | {:.1}s |\n",
        report.total_duration.as_secs_f64()
    ));
    content.push_str(&format!("| Rounds | {} |\n", state.iterations));
    content.push_str(&format!("| Results | {} |\n", state.results.len()));
    content.push_str("\n---\n\n");

    content.push_str("## Query\n\n");
    content.push_str(&format!("{}\n\n", state.query().trim()));

    content.push_str("## Sub-Task Results\n\n");
    let executed: Vec<&str> = report
        .trace
        .iter()
        .filter_map(|r| match &r.outcome {
            StageOutcome::Executed { task } => Some(task.as_str()),
            _ => None,
        })
        .collect();

    if state.results.is_empty() {
        content.push_str("*No sub-tasks were executed*\n\n");
    } else {
        for (idx, result) in state.results.iter().enumerate() {
            match executed.get(idx) {
                Some(task) => content.push_str(&format!("### Task {}: {}\n\n", idx + 1, task)),
                None => content.push_str(&format!("### Task {}\n\n", idx + 1)),
            }
            content.push_str(&format!("{}\n\n", result));
        }
    }

    content.push_str("## Final Reflection\n\n");
    content.push_str(&format!("{}\n\n", state.feedback));

    if !state.sub_tasks.is_empty() {
        content.push_str("## Not Executed\n\n");
        for task in &state.sub_tasks {
            content.push_str(&format!("- {}\n", task));
        }
        content.push('\n');
    }

    content.push_str("## Stage Trace\n\n");
    content.push_str("| Round | Stage | Outcome | Duration |\n");
    content.push_str("|-------|-------|---------|----------|\n");
    for record in &report.trace {
        content.push_str(&format!(
            "| {} | {} | {} | {}ms |\n",
            record.round,
            record.stage,
            format_outcome(&record.outcome),
            record.duration_ms
        ));
    }

    content
}

fn format_outcome(outcome: &StageOutcome) -> String {
    match outcome {
        StageOutcome::Planned { sub_tasks } => format!("planned {} sub-tasks", sub_tasks),
        StageOutcome::Executed { task } => format!("executed \"{}\"", task),
        StageOutcome::Skipped => "skipped (no pending sub-task)".to_string(),
        StageOutcome::Reviewed { iterations } => format!("review #{}", iterations),
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::workflow::orchestrator::StageRecord;
    use crate::workflow::state::WorkflowState;
    use crate::workflow::StageKind;
    use chrono::Utc;
    use std::time::Duration;
    use uuid::Uuid;

    pub(crate) fn sample_report() -> RunReport {
        let mut final_state = WorkflowState::new("Plan a birthday party");
        final_state.results = vec!["Venue booked for May 5".to_string()];
        final_state.current_task = "Book venue".to_string();
        final_state.sub_tasks = vec!["Order cake".to_string()];
        final_state.feedback = "Cake still missing".to_string();
        final_state.iterations = 1;

        RunReport {
            run_id: Uuid::new_v4(),
            started_at: Utc::now(),
            backend: "scripted".to_string(),
            initial_state: WorkflowState::new("Plan a birthday party"),
            final_state,
            trace: vec![
                StageRecord {
                    round: 1,
                    stage: StageKind::Planner,
                    outcome: StageOutcome::Planned { sub_tasks: 2 },
                    duration_ms: 12,
                },
                StageRecord {
                    round: 1,
                    stage: StageKind::Executor,
                    outcome: StageOutcome::Executed {
                        task: "Book venue".to_string(),
                    },
                    duration_ms: 30,
                },
                StageRecord {
                    round: 1,
                    stage: StageKind::Reviewer,
                    outcome: StageOutcome::Reviewed { iterations: 1 },
                    duration_ms: 8,
                },
            ],
            total_duration: Duration::from_millis(50),
        }
    }

    #[test]
    fn test_markdown_contents() {
        let md = build_report_markdown(&sample_report());
        assert!(md.contains("### Task 1: Book venue"));
        assert!(md.contains("Venue booked for May 5"));
        assert!(md.contains("## Final Reflection\n\nCake still missing"));
        assert!(md.contains("## Not Executed\n\n- Order cake"));
        assert!(md.contains("| 1 | Executor | executed \"Book venue\" | 30ms |"));
    }

    #[test]
    fn test_write_run_report() {
        let dir = tempfile::tempdir().unwrap();
        let report = sample_report();

        let md_path = write_run_report(dir.path(), &report).unwrap();
        assert!(md_path.exists());

        let json_path = dir.path().join(format!("{}.json", report.run_id));
        let json: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(json_path).unwrap()).unwrap();
        assert_eq!(json["final_state"]["iterations"], 1);
        assert_eq!(json["initial_state"]["results"], serde_json::json!([]));
        assert_eq!(json["trace"][1]["outcome"]["kind"], "executed");
        assert!(json["duration_sec"].as_f64().unwrap() > 0.0);
    }
}
