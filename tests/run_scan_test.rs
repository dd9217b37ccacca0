//! End-to-end orchestration tests against a scripted in-memory API.

use pentest_ci::{
    run_scan, DispatchResult, ScanApi, ScanConfig, ScanError, ScanResult, ScanState, ScanStatus,
    Severity, SeverityCounts,
};
use pentest_ci::api::DispatchRequest;
use std::cell::RefCell;
use std::collections::VecDeque;
use std::time::Duration;

enum Step {
    Status(ScanStatus),
    TransportError,
}

struct ScriptedApi {
    dispatch_result: ScanResult<DispatchResult>,
    steps: RefCell<VecDeque<Step>>,
    dispatch_calls: RefCell<u32>,
    status_calls: RefCell<u32>,
}

impl ScriptedApi {
    fn new(steps: Vec<Step>) -> Self {
        Self {
            dispatch_result: Ok(DispatchResult {
                scan_id: "s1".to_string(),
                label: "api-prod".to_string(),
            }),
            steps: RefCell::new(steps.into()),
            dispatch_calls: RefCell::new(0),
            status_calls: RefCell::new(0),
        }
    }

    fn failing_dispatch(error: ScanError) -> Self {
        Self {
            dispatch_result: Err(error),
            ..Self::new(vec![])
        }
    }
}

impl ScanApi for ScriptedApi {
    fn dispatch(&self, _request: &DispatchRequest) -> ScanResult<DispatchResult> {
        *self.dispatch_calls.borrow_mut() += 1;
        match &self.dispatch_result {
            Ok(result) => Ok(result.clone()),
            Err(ScanError::Transport { status, message }) => Err(ScanError::Transport {
                status: *status,
                message: message.clone(),
            }),
            Err(other) => Err(ScanError::Config(other.to_string())),
        }
    }

    fn status(&self, scan_id: &str) -> ScanResult<ScanStatus> {
        assert_eq!(scan_id, "s1", "polls are keyed by the dispatched id");
        *self.status_calls.borrow_mut() += 1;
        match self.steps.borrow_mut().pop_front() {
            Some(Step::Status(status)) => Ok(status),
            Some(Step::TransportError) | None => Err(ScanError::Transport {
                status: 502,
                message: "Bad Gateway".to_string(),
            }),
        }
    }
}

fn snapshot(state: ScanState) -> ScanStatus {
    ScanStatus {
        scan_id: "s1".to_string(),
        label: "api-prod".to_string(),
        state,
        started_at: None,
        completed_at: None,
        error_message: None,
        issues_count: 0,
        issue_counts_by_severity: None,
        report_ready: false,
    }
}

fn config(wait: bool) -> ScanConfig {
    ScanConfig {
        api_key: "k".to_string(),
        project_id: Some("web-app".to_string()),
        repo_id: None,
        branch: None,
        level: None,
        environment: None,
        wait,
        poll_interval: Duration::ZERO,
        fail_on: Severity::High,
    }
}

#[test]
fn full_run_returns_terminal_record_and_gates_on_threshold() {
    let terminal = ScanStatus {
        state: ScanState::Completed,
        issues_count: 6,
        issue_counts_by_severity: Some(SeverityCounts {
            critical: 1,
            high: 2,
            medium: 3,
            ..Default::default()
        }),
        ..snapshot(ScanState::Completed)
    };
    let api = ScriptedApi::new(vec![
        Step::Status(snapshot(ScanState::Queued)),
        Step::Status(snapshot(ScanState::Running)),
        Step::Status(terminal),
    ]);

    let mut observed = Vec::new();
    let status = run_scan(&config(true), &api, &mut |s| observed.push(s.state)).unwrap();

    assert_eq!(*api.dispatch_calls.borrow(), 1);
    assert_eq!(*api.status_calls.borrow(), 3);
    assert_eq!(
        observed,
        vec![ScanState::Queued, ScanState::Running, ScanState::Completed]
    );

    // The gating policy blocks on the filtered count while the total
    // stays visible.
    assert_eq!(status.issues_count, 6);
    assert_eq!(status.blocking_issues(Severity::High), 3);
    assert_eq!(status.blocking_issues(Severity::Info), 6);
}

#[test]
fn completed_record_without_breakdown_never_blocks() {
    let terminal = ScanStatus {
        state: ScanState::Completed,
        issues_count: 9,
        ..snapshot(ScanState::Completed)
    };
    let api = ScriptedApi::new(vec![Step::Status(terminal)]);

    let status = run_scan(&config(true), &api, &mut |_| {}).unwrap();
    assert_eq!(status.blocking_issues(Severity::Info), 0);
    assert_eq!(status.issues_count, 9, "total still surfaced for visibility");
}

#[test]
fn no_wait_returns_synthesized_queued_record_without_polling() {
    let api = ScriptedApi::new(vec![]);
    let status = run_scan(&config(false), &api, &mut |_| {}).unwrap();

    assert_eq!(*api.dispatch_calls.borrow(), 1);
    assert_eq!(*api.status_calls.borrow(), 0);
    assert_eq!(status.state, ScanState::Queued);
    assert_eq!(status.label, "api-prod");
    assert!(status.issue_counts_by_severity.is_none());
}

#[test]
fn dispatch_transport_error_is_terminal() {
    let api = ScriptedApi::failing_dispatch(ScanError::Transport {
        status: 401,
        message: "API key revoked".to_string(),
    });

    let err = run_scan(&config(true), &api, &mut |_| {}).unwrap_err();
    assert!(err.to_string().contains("API key revoked"));
    assert_eq!(*api.dispatch_calls.borrow(), 1, "dispatch is not retried");
    assert_eq!(*api.status_calls.borrow(), 0, "a failed dispatch is never polled");
}

#[test]
fn poll_transport_error_fails_the_whole_operation() {
    let api = ScriptedApi::new(vec![
        Step::Status(snapshot(ScanState::Running)),
        Step::TransportError,
    ]);

    let err = run_scan(&config(true), &api, &mut |_| {}).unwrap_err();
    assert!(matches!(err, ScanError::Transport { status: 502, .. }));
    assert_eq!(*api.status_calls.borrow(), 2);
}

#[test]
fn paused_scan_surfaces_a_pause_specific_error() {
    let api = ScriptedApi::new(vec![
        Step::Status(snapshot(ScanState::Running)),
        Step::Status(snapshot(ScanState::Paused)),
    ]);

    let mut observed = Vec::new();
    let err = run_scan(&config(true), &api, &mut |s| observed.push(s.state)).unwrap_err();

    assert!(matches!(err, ScanError::RemotePaused));
    assert!(err.to_string().contains("paused"));
    assert_eq!(
        observed,
        vec![ScanState::Running, ScanState::Paused],
        "terminal status is observed before the error returns"
    );
    assert_eq!(*api.status_calls.borrow(), 2, "no requests after pause");
}
