//! Scanning-service API: endpoint resolution, request types, and the
//! client/polling implementations.

mod client;
mod poll;

pub use client::HttpScanClient;
pub use poll::{StatusPoller, DEFAULT_POLL_INTERVAL_MS};

use crate::error::ScanResult;
use crate::models::{DispatchResult, ScanStatus};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Target API environment. Production is the default; the others exist
/// for integration testing against pre-release service builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Environment {
    Dev,
    Staging,
    #[default]
    Production,
}

impl Environment {
    /// Case-insensitive parse. Unknown values return `None`.
    pub fn parse(raw: &str) -> Option<Environment> {
        match raw.trim().to_lowercase().as_str() {
            "dev" => Some(Environment::Dev),
            "staging" => Some(Environment::Staging),
            "production" => Some(Environment::Production),
            _ => None,
        }
    }

    /// Base API URL for this environment. An absent selector resolves to
    /// the production host; `dev` and `staging` warn that a non-production
    /// endpoint is in use.
    pub fn base_url(selector: Option<Environment>) -> &'static str {
        match selector.unwrap_or_default() {
            Environment::Dev => {
                warn!("using dev API endpoint: {}", Self::DEV_URL);
                Self::DEV_URL
            }
            Environment::Staging => {
                warn!("using staging API endpoint: {}", Self::STAGING_URL);
                Self::STAGING_URL
            }
            Environment::Production => Self::PRODUCTION_URL,
        }
    }

    const DEV_URL: &'static str = "https://api.dev.pentest-ci.io";
    const STAGING_URL: &'static str = "https://api.staging.pentest-ci.io";
    const PRODUCTION_URL: &'static str = "https://api.pentest-ci.io";
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Dev => write!(f, "dev"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Scan depth requested at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanLevel {
    /// High-signal subset of checks, suitable for per-PR runs.
    Priority,
    /// The complete check suite.
    Full,
}

impl ScanLevel {
    pub fn parse(raw: &str) -> Option<ScanLevel> {
        match raw.trim().to_lowercase().as_str() {
            "priority" => Some(ScanLevel::Priority),
            "full" => Some(ScanLevel::Full),
            _ => None,
        }
    }
}

impl std::fmt::Display for ScanLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanLevel::Priority => write!(f, "priority"),
            ScanLevel::Full => write!(f, "full"),
        }
    }
}

/// Body of `POST /ci/dispatch`. Exactly one of `project_id`/`repo_id`
/// must be set; the client checks this before any network call.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DispatchRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repo_id: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scan_level: Option<ScanLevel>,
}

impl DispatchRequest {
    pub fn has_target(&self) -> bool {
        self.project_id.is_some() || self.repo_id.is_some()
    }
}

/// The two remote operations the orchestrator needs. `HttpScanClient` is
/// the production implementation; tests substitute scripted fakes.
pub trait ScanApi {
    fn dispatch(&self, request: &DispatchRequest) -> ScanResult<DispatchResult>;
    fn status(&self, scan_id: &str) -> ScanResult<ScanStatus>;
}
