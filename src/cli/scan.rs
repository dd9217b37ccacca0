//! Scan command - dispatch, optionally wait, gate the build.

use crate::api::{Environment, HttpScanClient, ScanLevel};
use crate::cli::ApiArgs;
use crate::config::{EnvConfig, Overrides, ScanConfig};
use crate::models::{ScanState, Severity};
use crate::report;
use crate::runner;
use anyhow::Result;
use console::style;

pub struct ScanArgs {
    pub project_id: Option<String>,
    pub repo_id: Option<u64>,
    pub branch: Option<String>,
    pub level: Option<String>,
    pub no_wait: bool,
    pub poll_interval: Option<u64>,
    pub fail_on: Option<String>,
    pub format: String,
    pub api: ApiArgs,
}

pub fn run(args: ScanArgs) -> Result<()> {
    let overrides = Overrides {
        api_key: args.api.api_key,
        project_id: args.project_id,
        repo_id: args.repo_id,
        branch: args.branch,
        // clap has already restricted these to the valid literals
        level: args.level.as_deref().and_then(ScanLevel::parse),
        environment: args.api.environment.as_deref().and_then(Environment::parse),
        no_wait: args.no_wait,
        poll_interval_ms: args.poll_interval,
        fail_on: args.fail_on.as_deref().and_then(Severity::parse),
    };
    let config = ScanConfig::resolve(overrides, EnvConfig::from_process())?;

    let client = HttpScanClient::new(Environment::base_url(config.environment), &config.api_key);

    let text_output = args.format != "json";
    let mut last_state: Option<ScanState> = None;
    let result = runner::run_scan(&config, &client, &mut |snapshot| {
        // One line per state transition; the poller logs every attempt.
        if text_output && last_state != Some(snapshot.state) {
            println!("  {} {}", style("->").dim(), snapshot.state);
            last_state = Some(snapshot.state);
        }
    });
    let status = result?;

    if text_output {
        report::print_summary(&status, config.fail_on);
    } else {
        println!("{}", report::render_json(&status));
    }

    check_fail_threshold(&status, config.fail_on)
}

/// Exit non-zero when a completed scan has issues at or above the
/// threshold. Only the CLI layer terminates the process.
fn check_fail_threshold(status: &crate::models::ScanStatus, fail_on: Severity) -> Result<()> {
    if status.state == ScanState::Completed {
        let blocking = status.blocking_issues(fail_on);
        if blocking > 0 {
            eprintln!(
                "Failing: {} issue(s) at or above the '{}' threshold",
                blocking, fail_on
            );
            std::process::exit(1);
        }
    }
    Ok(())
}
