//! Human-readable rendering of a scan status record.

use crate::models::{ScanState, ScanStatus, Severity};
use console::style;

fn styled_count(severity: Severity, count: u32) -> String {
    let text = count.to_string();
    match severity {
        Severity::Critical if count > 0 => style(text).red().bold().to_string(),
        Severity::High if count > 0 => style(text).yellow().to_string(),
        _ if count > 0 => style(text).cyan().to_string(),
        _ => style(text).dim().to_string(),
    }
}

/// Print the scan summary block to stdout.
pub fn print_summary(status: &ScanStatus, fail_on: Severity) {
    println!();
    println!("  Scan:   {} (ID: {})", style(&status.label).cyan(), status.scan_id);
    println!("  Status: {}", render_state(status.state));

    if let Some(started) = status.started_at {
        println!("  Started:   {}", style(started.to_rfc3339()).dim());
    }
    if let Some(completed) = status.completed_at {
        println!("  Completed: {}", style(completed.to_rfc3339()).dim());
    }
    if let Some(message) = status.error_message.as_deref() {
        println!("  Error: {}", style(message).red());
    }

    if status.state == ScanState::Completed {
        println!();
        println!("  Issues: {} total", style(status.issues_count).cyan());
        if let Some(counts) = status.issue_counts_by_severity {
            for severity in Severity::DESCENDING {
                println!(
                    "    {:<9} {}",
                    severity,
                    styled_count(severity, counts.get(severity))
                );
            }
            // The per-severity sum can drift from issuesCount across API
            // versions; surface it, don't fail on it.
            if counts.total() != status.issues_count {
                println!(
                    "    {}",
                    style(format!(
                        "(severity breakdown covers {} of {} issues)",
                        counts.total(),
                        status.issues_count
                    ))
                    .dim()
                );
            }
        }

        println!();
        let blocking = status.blocking_issues(fail_on);
        if blocking > 0 {
            println!(
                "  {} {} blocking issue(s) at or above '{}'",
                style("[FAIL]").red().bold(),
                blocking,
                fail_on
            );
        } else {
            println!(
                "  {} no blocking issues at or above '{}'",
                style("[OK]").green(),
                fail_on
            );
        }

        if status.report_ready {
            println!("  Report is ready for download from the dashboard.");
        }
    }
    println!();
}

fn render_state(state: ScanState) -> String {
    match state {
        ScanState::Completed => style("completed").green().to_string(),
        ScanState::Failed => style("failed").red().to_string(),
        ScanState::Paused => style("paused").yellow().to_string(),
        ScanState::Queued | ScanState::Running => style(state.to_string()).cyan().to_string(),
    }
}

/// Machine-readable rendering for `--format json`.
pub fn render_json(status: &ScanStatus) -> String {
    serde_json::to_string_pretty(status).expect("status record serializes")
}
