//! Invocation configuration.
//!
//! Built once at process start from explicit CLI arguments merged over
//! environment variables, then passed by value into the orchestrator. The
//! core never reads ambient process state after this point.

mod ci_env;

pub use ci_env::CiPlatform;

use crate::api::{Environment, ScanLevel, DEFAULT_POLL_INTERVAL_MS};
use crate::error::{ScanError, ScanResult};
use crate::models::Severity;
use std::time::Duration;
use tracing::warn;

pub const API_KEY_VAR: &str = "PENTEST_CI_API_KEY";
pub const PROJECT_ID_VAR: &str = "PENTEST_CI_PROJECT_ID";
pub const ENVIRONMENT_VAR: &str = "PENTEST_CI_ENV";
pub const FAIL_ON_VAR: &str = "PENTEST_CI_FAIL_ON";

/// Parse a severity threshold leniently. An unrecognized value warns and
/// degrades to the strictest threshold rather than aborting: malformed
/// configuration must never silently pass a CI run that should block.
pub fn parse_fail_on(raw: &str) -> Severity {
    match Severity::parse(raw) {
        Some(severity) => severity,
        None => {
            warn!(
                "unrecognized severity threshold '{}' (expected one of: critical, high, medium, low, info); defaulting to critical",
                raw
            );
            Severity::Critical
        }
    }
}

/// Parse an environment selector leniently. Unknown values warn and fall
/// back to the default production endpoint.
pub fn parse_environment(raw: &str) -> Option<Environment> {
    let parsed = Environment::parse(raw);
    if parsed.is_none() {
        warn!(
            "unrecognized environment '{}' (expected one of: dev, staging, production); using production",
            raw
        );
    }
    parsed
}

fn nonempty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

/// Configuration values sourced from the process environment, including
/// CI-platform-specific variables. Captured once at the boundary.
#[derive(Debug, Clone, Default)]
pub struct EnvConfig {
    pub project_id: Option<String>,
    pub repo_id: Option<u64>,
    pub branch: Option<String>,
    pub environment: Option<Environment>,
    pub fail_on: Option<Severity>,
}

impl EnvConfig {
    pub fn from_process() -> Self {
        let platform = CiPlatform::detect();
        EnvConfig {
            project_id: nonempty_var(PROJECT_ID_VAR),
            repo_id: platform.and_then(|p| p.repo_id()),
            branch: platform.and_then(|p| p.branch()),
            environment: nonempty_var(ENVIRONMENT_VAR).and_then(|raw| parse_environment(&raw)),
            fail_on: nonempty_var(FAIL_ON_VAR).map(|raw| parse_fail_on(&raw)),
        }
    }
}

/// Explicit values from the command line. `None` means "fall back to the
/// environment".
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub api_key: Option<String>,
    pub project_id: Option<String>,
    pub repo_id: Option<u64>,
    pub branch: Option<String>,
    pub level: Option<ScanLevel>,
    pub environment: Option<Environment>,
    pub no_wait: bool,
    pub poll_interval_ms: Option<u64>,
    pub fail_on: Option<Severity>,
}

/// Fully-resolved invocation configuration. Constructed once, consumed
/// once, never mutated.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub api_key: String,
    pub project_id: Option<String>,
    pub repo_id: Option<u64>,
    pub branch: Option<String>,
    pub level: Option<ScanLevel>,
    pub environment: Option<Environment>,
    pub wait: bool,
    pub poll_interval: Duration,
    pub fail_on: Severity,
}

impl ScanConfig {
    /// Merge explicit arguments over environment-sourced values. An
    /// explicit identifier (either kind) suppresses both environment
    /// identifiers; when both environment identifiers are present the
    /// project id wins.
    pub fn resolve(overrides: Overrides, env: EnvConfig) -> ScanResult<ScanConfig> {
        let api_key = overrides
            .api_key
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| {
                ScanError::Config(format!(
                    "no API key: set {} or pass --api-key",
                    API_KEY_VAR
                ))
            })?;

        let (project_id, repo_id) =
            match (overrides.project_id, overrides.repo_id) {
                (None, None) => match env.project_id {
                    Some(project) => (Some(project), None),
                    None => (None, env.repo_id),
                },
                explicit => explicit,
            };

        if project_id.is_none() && repo_id.is_none() {
            return Err(ScanError::Config(format!(
                "no scan target: pass --project-id or --repo-id, set {}, or run inside a supported CI pipeline",
                PROJECT_ID_VAR
            )));
        }

        Ok(ScanConfig {
            api_key,
            project_id,
            repo_id,
            branch: overrides.branch.or(env.branch),
            level: overrides.level,
            environment: overrides.environment.or(env.environment),
            wait: !overrides.no_wait,
            poll_interval: Duration::from_millis(
                overrides.poll_interval_ms.unwrap_or(DEFAULT_POLL_INTERVAL_MS),
            ),
            fail_on: overrides
                .fail_on
                .or(env.fail_on)
                .unwrap_or(Severity::Critical),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keyed(overrides: Overrides) -> Overrides {
        Overrides {
            api_key: Some("k".to_string()),
            ..overrides
        }
    }

    #[test]
    fn missing_api_key_is_a_config_error() {
        let err = ScanConfig::resolve(
            Overrides {
                project_id: Some("p".to_string()),
                ..Default::default()
            },
            EnvConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
        assert!(err.to_string().contains(API_KEY_VAR));
    }

    #[test]
    fn blank_api_key_counts_as_unset() {
        let err = ScanConfig::resolve(
            Overrides {
                api_key: Some("   ".to_string()),
                project_id: Some("p".to_string()),
                ..Default::default()
            },
            EnvConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }

    #[test]
    fn missing_identifier_is_a_config_error() {
        let err = ScanConfig::resolve(keyed(Overrides::default()), EnvConfig::default())
            .unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }

    #[test]
    fn explicit_identifier_wins_over_environment() {
        let config = ScanConfig::resolve(
            keyed(Overrides {
                repo_id: Some(7),
                ..Default::default()
            }),
            EnvConfig {
                project_id: Some("env-project".to_string()),
                repo_id: Some(99),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(config.project_id, None);
        assert_eq!(config.repo_id, Some(7));
    }

    #[test]
    fn env_project_id_wins_over_env_repo_id() {
        let config = ScanConfig::resolve(
            keyed(Overrides::default()),
            EnvConfig {
                project_id: Some("env-project".to_string()),
                repo_id: Some(99),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(config.project_id.as_deref(), Some("env-project"));
        assert_eq!(config.repo_id, None);
    }

    #[test]
    fn defaults_wait_interval_and_threshold() {
        let config = ScanConfig::resolve(
            keyed(Overrides {
                project_id: Some("p".to_string()),
                ..Default::default()
            }),
            EnvConfig::default(),
        )
        .unwrap();
        assert!(config.wait);
        assert_eq!(config.poll_interval, Duration::from_millis(5000));
        assert_eq!(config.fail_on, Severity::Critical);
        assert_eq!(config.environment, None);
    }

    #[test]
    fn explicit_threshold_wins_over_environment_threshold() {
        let config = ScanConfig::resolve(
            keyed(Overrides {
                project_id: Some("p".to_string()),
                fail_on: Some(Severity::Low),
                ..Default::default()
            }),
            EnvConfig {
                fail_on: Some(Severity::High),
                ..Default::default()
            },
        )
        .unwrap();
        assert_eq!(config.fail_on, Severity::Low);
    }

    #[test]
    fn lenient_threshold_parse_degrades_to_strictest() {
        assert_eq!(parse_fail_on("HIGH"), Severity::High);
        assert_eq!(parse_fail_on("severe"), Severity::Critical);
        assert_eq!(parse_fail_on(""), Severity::Critical);
    }

    #[test]
    fn lenient_environment_parse_falls_back_to_default() {
        assert_eq!(parse_environment("staging"), Some(Environment::Staging));
        assert_eq!(parse_environment("qa"), None);
    }
}
