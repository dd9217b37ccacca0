//! CI-platform variable mapping.
//!
//! GitHub Actions and GitLab CI expose branch and repository identity
//! under different variable names; this module normalizes them so the
//! rest of the crate never needs to know which platform it runs on.

use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CiPlatform {
    GitHubActions,
    GitLabCi,
}

/// Numeric platform identifiers arrive as strings; non-numeric input is
/// treated as absent, not an error, so callers can fall back to a
/// project id.
fn parse_numeric_id(raw: &str) -> Option<u64> {
    raw.trim().parse::<u64>().ok()
}

fn nonempty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

impl CiPlatform {
    pub fn detect() -> Option<CiPlatform> {
        if std::env::var_os("GITHUB_ACTIONS").is_some() {
            debug!("detected GitHub Actions environment");
            Some(CiPlatform::GitHubActions)
        } else if std::env::var_os("GITLAB_CI").is_some() {
            debug!("detected GitLab CI environment");
            Some(CiPlatform::GitLabCi)
        } else {
            None
        }
    }

    /// Branch under scan. For pull/merge requests the source branch is
    /// preferred over the synthetic ref the platform checks out.
    pub fn branch(self) -> Option<String> {
        match self {
            CiPlatform::GitHubActions => {
                nonempty_var("GITHUB_HEAD_REF").or_else(|| nonempty_var("GITHUB_REF_NAME"))
            }
            CiPlatform::GitLabCi => nonempty_var("CI_MERGE_REQUEST_SOURCE_BRANCH_NAME")
                .or_else(|| nonempty_var("CI_COMMIT_REF_NAME")),
        }
    }

    /// Platform-assigned numeric repository identifier.
    pub fn repo_id(self) -> Option<u64> {
        let raw = match self {
            CiPlatform::GitHubActions => nonempty_var("GITHUB_REPOSITORY_ID"),
            CiPlatform::GitLabCi => nonempty_var("CI_PROJECT_ID"),
        };
        raw.as_deref().and_then(parse_numeric_id)
    }
}

impl std::fmt::Display for CiPlatform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CiPlatform::GitHubActions => write!(f, "GitHub Actions"),
            CiPlatform::GitLabCi => write!(f, "GitLab CI"),
        }
    }
}
