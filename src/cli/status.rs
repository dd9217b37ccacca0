//! Status command - one-shot status check for a dispatched scan.

use crate::api::{Environment, HttpScanClient, ScanApi};
use crate::cli::ApiArgs;
use crate::config::{EnvConfig, API_KEY_VAR};
use crate::models::{ScanState, Severity};
use crate::report;
use anyhow::Result;

pub fn run(scan_id: &str, fail_on: Option<&str>, format: &str, api: ApiArgs) -> Result<()> {
    let Some(api_key) = api.api_key.filter(|k| !k.trim().is_empty()) else {
        anyhow::bail!("no API key: set {} or pass --api-key", API_KEY_VAR);
    };

    let env = EnvConfig::from_process();
    let environment = api
        .environment
        .as_deref()
        .and_then(Environment::parse)
        .or(env.environment);
    let fail_on = fail_on
        .and_then(Severity::parse)
        .or(env.fail_on)
        .unwrap_or(Severity::Critical);

    let client = HttpScanClient::new(Environment::base_url(environment), api_key);
    let status = client.status(scan_id)?;

    if format == "json" {
        println!("{}", report::render_json(&status));
    } else {
        report::print_summary(&status, fail_on);
    }

    match status.state {
        ScanState::Completed => {
            let blocking = status.blocking_issues(fail_on);
            if blocking > 0 {
                eprintln!(
                    "Failing: {} issue(s) at or above the '{}' threshold",
                    blocking, fail_on
                );
                std::process::exit(1);
            }
            Ok(())
        }
        ScanState::Failed | ScanState::Paused => {
            eprintln!("Failing: scan is {}", status.state);
            std::process::exit(1);
        }
        // A scan still in flight is not a CI failure.
        ScanState::Queued | ScanState::Running => Ok(()),
    }
}
