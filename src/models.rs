//! Core data models for pentest-ci
//!
//! Wire types for the dispatch and status endpoints, plus the severity
//! ordering used for CI gating decisions.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Severity levels for reported issues, ordered least to most severe.
///
/// The derived `Ord` makes `Critical` the maximum, so "at or above a
/// threshold" is a plain `>=` comparison.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    #[default]
    Info,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All levels, most severe first.
    pub const DESCENDING: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Info,
    ];

    /// Case-insensitive parse. Returns `None` for unrecognized input;
    /// callers decide whether to error or degrade to a default.
    pub fn parse(raw: &str) -> Option<Severity> {
        match raw.trim().to_lowercase().as_str() {
            "critical" => Some(Severity::Critical),
            "high" => Some(Severity::High),
            "medium" => Some(Severity::Medium),
            "low" => Some(Severity::Low),
            "info" => Some(Severity::Info),
            _ => None,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Low => write!(f, "low"),
            Severity::Medium => write!(f, "medium"),
            Severity::High => write!(f, "high"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

/// Remote job state. Transitions are owned entirely by the scanning
/// service; this client only observes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanState {
    Queued,
    Running,
    Completed,
    Failed,
    Paused,
}

impl ScanState {
    /// `completed`, `failed`, and `paused` end the polling loop.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ScanState::Completed | ScanState::Failed | ScanState::Paused
        )
    }
}

impl std::fmt::Display for ScanState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanState::Queued => write!(f, "queued"),
            ScanState::Running => write!(f, "running"),
            ScanState::Completed => write!(f, "completed"),
            ScanState::Failed => write!(f, "failed"),
            ScanState::Paused => write!(f, "paused"),
        }
    }
}

/// Issue counts broken down by severity. Levels absent from the wire
/// payload default to 0.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeverityCounts {
    #[serde(default)]
    pub critical: u32,
    #[serde(default)]
    pub high: u32,
    #[serde(default)]
    pub medium: u32,
    #[serde(default)]
    pub low: u32,
    #[serde(default)]
    pub info: u32,
}

impl SeverityCounts {
    pub fn get(&self, severity: Severity) -> u32 {
        match severity {
            Severity::Critical => self.critical,
            Severity::High => self.high,
            Severity::Medium => self.medium,
            Severity::Low => self.low,
            Severity::Info => self.info,
        }
    }

    pub fn total(&self) -> u32 {
        self.critical + self.high + self.medium + self.low + self.info
    }
}

/// Count of issues at `threshold` severity or above.
///
/// A missing breakdown counts as all-zero. Callers gating a build must
/// still surface the unfiltered `issues_count`, since "no breakdown" is
/// not the same claim as "zero issues".
pub fn count_at_or_above(breakdown: Option<&SeverityCounts>, threshold: Severity) -> u32 {
    let Some(counts) = breakdown else {
        return 0;
    };
    Severity::DESCENDING
        .iter()
        .take_while(|s| **s >= threshold)
        .map(|s| counts.get(*s))
        .sum()
}

/// Minimal identity returned by the dispatch endpoint, used to key
/// subsequent status polls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchResult {
    pub scan_id: String,
    pub label: String,
}

/// Full status payload from `GET /ci/status/{scanId}`.
///
/// `scan_id`, `label`, and `state` are required; the progress fields stay
/// at their null/zero defaults until the corresponding remote transition
/// has happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStatus {
    pub scan_id: String,
    pub label: String,
    #[serde(rename = "status")]
    pub state: ScanState,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub issues_count: u32,
    #[serde(default)]
    pub issue_counts_by_severity: Option<SeverityCounts>,
    #[serde(default)]
    pub report_ready: bool,
}

impl ScanStatus {
    /// Synthesized record for a dispatch that was not waited on. Carries
    /// identity only; progress fields are at their defaults and the
    /// remote queued-vs-running state has not been confirmed.
    pub fn queued(dispatch: DispatchResult) -> Self {
        ScanStatus {
            scan_id: dispatch.scan_id,
            label: dispatch.label,
            state: ScanState::Queued,
            started_at: None,
            completed_at: None,
            error_message: None,
            issues_count: 0,
            issue_counts_by_severity: None,
            report_ready: false,
        }
    }

    /// Issues at or above `threshold`, per the gating policy.
    pub fn blocking_issues(&self, threshold: Severity) -> u32 {
        count_at_or_above(self.issue_counts_by_severity.as_ref(), threshold)
    }
}
