//! Human-readable and JSON renderings of run reports.

use crate::orchestrator::SuiteOutcome;
use crate::report::RunReport;
use comfy_table::{presets::UTF8_FULL, Cell, Color, Table};

/// Format a run report as a per-worker table followed by the totals.
pub fn format_table(report: &RunReport) -> String {
    let mut output = String::new();

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Worker", "Executed", "Errors", "Duration", "Status"]);

    for worker in &report.workers {
        let status_cell = if worker.succeeded() {
            Cell::new("OK").fg(Color::Green)
        } else {
            Cell::new("FAILED").fg(Color::Red)
        };

        table.add_row(vec![
            Cell::new(worker.worker_index),
            Cell::new(worker.statements_executed),
            Cell::new(worker.errors.len()),
            Cell::new(format_duration_ms(worker.duration_ms)),
            status_cell,
        ]);
    }

    table.add_row(vec![
        Cell::new("TOTAL").fg(Color::Cyan),
        Cell::new(report.statements_executed()),
        Cell::new(report.errors.len()),
        Cell::new(format_duration_ms(report.duration_ms)),
        Cell::new(format!("{}/{}", report.total - report.failed, report.total)),
    ]);

    output.push_str(&format!(
        "{} on {} ({} clients x {} runs, {} provisioned)\n",
        report.scenario,
        report.store,
        report.client_count,
        report.runs_per_client,
        report.precondition_count
    ));
    output.push_str(&table.to_string());
    output.push('\n');

    match report.child_count {
        Some(check) => output.push_str(&format!(
            "Children: expected {}, observed {}\n",
            check.expected, check.observed
        )),
        None => output.push_str("Children: not verified\n"),
    }
    if report.timed_out {
        output.push_str("Deadline elapsed; workers were cancelled\n");
    }
    if let Some(ref err) = report.verification_error {
        output.push_str(&format!("Verification error: {err}\n"));
    }
    if let Some(ref err) = report.teardown_error {
        output.push_str(&format!("Teardown error: {err}\n"));
    }

    if !report.errors.is_empty() {
        output.push_str("\nFailures:\n");
        for error in &report.errors {
            output.push_str(&format!("  {error}\n"));
        }
    }

    output.push_str(if report.passed() { "PASSED\n" } else { "FAILED\n" });
    output
}

/// Format a suite as one overview table plus each completed report.
pub fn format_suite_table(outcomes: &[SuiteOutcome]) -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Scenario", "Clients", "Runs", "Children", "Status"]);

    let mut details = String::new();
    for outcome in outcomes {
        match outcome {
            SuiteOutcome::Completed(report) => {
                let children = report
                    .child_count
                    .map(|c| format!("{}/{}", c.observed, c.expected))
                    .unwrap_or_else(|| "-".to_string());
                let status = if report.passed() {
                    Cell::new("PASSED").fg(Color::Green)
                } else {
                    Cell::new("FAILED").fg(Color::Red)
                };
                table.add_row(vec![
                    Cell::new(report.scenario),
                    Cell::new(report.client_count),
                    Cell::new(report.runs_per_client),
                    Cell::new(children),
                    status,
                ]);
                details.push('\n');
                details.push_str(&format_table(report));
            }
            SuiteOutcome::Rejected { scenario, reason } => {
                table.add_row(vec![
                    Cell::new(scenario),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("REJECTED").fg(Color::Yellow),
                ]);
                details.push_str(&format!("\n{scenario} rejected: {reason}\n"));
            }
            SuiteOutcome::Aborted { scenario, reason } => {
                table.add_row(vec![
                    Cell::new(scenario),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("-"),
                    Cell::new("ABORTED").fg(Color::Red),
                ]);
                details.push_str(&format!("\n{scenario} aborted: {reason}\n"));
            }
        }
    }

    format!("{table}\n{details}")
}

/// Format a duration in milliseconds in human-readable form.
fn format_duration_ms(ms: u64) -> String {
    let secs = ms as f64 / 1000.0;
    if secs < 60.0 {
        format!("{secs:.1}s")
    } else {
        let mins = (secs / 60.0).floor();
        let remaining_secs = secs - (mins * 60.0);
        format!("{}m {:02.0}s", mins as u64, remaining_secs)
    }
}
