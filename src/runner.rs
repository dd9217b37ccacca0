//! Scan orchestration: dispatch, then optionally poll to a terminal state.

use crate::api::{DispatchRequest, ScanApi, StatusPoller};
use crate::config::ScanConfig;
use crate::error::{ScanError, ScanResult};
use crate::models::ScanStatus;
use tracing::info;

/// Dispatch a scan and, unless `config.wait` is false, poll until the
/// remote job terminates.
///
/// With `wait == false` the returned record is synthesized from the
/// dispatch identity with `queued` state and default progress fields; the
/// remote queued-vs-running state is not confirmed. With `wait == true`
/// the terminal record is returned verbatim. Human-readable progress is
/// advisory logging only, never part of the return contract.
pub fn run_scan(
    config: &ScanConfig,
    api: &dyn ScanApi,
    observer: &mut dyn FnMut(&ScanStatus),
) -> ScanResult<ScanStatus> {
    if config.project_id.is_none() && config.repo_id.is_none() {
        return Err(ScanError::Config(
            "no scan target: a project id or repo id is required".to_string(),
        ));
    }

    let request = DispatchRequest {
        project_id: config.project_id.clone(),
        repo_id: config.repo_id,
        branch: config.branch.clone(),
        scan_level: config.level,
    };

    info!(
        "dispatching {} scan for {}",
        config
            .level
            .map(|l| l.to_string())
            .unwrap_or_else(|| "default".to_string()),
        config
            .project_id
            .clone()
            .unwrap_or_else(|| format!("repo {}", config.repo_id.unwrap_or(0)))
    );

    let dispatched = api.dispatch(&request)?;
    info!("dispatched '{}' (ID: {})", dispatched.label, dispatched.scan_id);

    if !config.wait {
        return Ok(ScanStatus::queued(dispatched));
    }

    let terminal = StatusPoller::new(config.poll_interval).wait_until_terminal(
        api,
        &dispatched.scan_id,
        observer,
    )?;
    info!(
        "scan '{}' completed with {} issue(s)",
        terminal.label, terminal.issues_count
    );
    Ok(terminal)
}
