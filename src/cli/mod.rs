//! CLI command definitions and handlers

mod doctor;
mod scan;
mod status;

use crate::config::API_KEY_VAR;
use anyhow::Result;
use clap::{Args, Parser, Subcommand};

/// pentest-ci - trigger remote pentest scans from CI pipelines
#[derive(Parser, Debug)]
#[command(name = "pentest-ci")]
#[command(
    version,
    about = "Trigger a remote pentest scan and gate the build on findings severity",
    after_help = "\
Examples:
  pentest-ci scan --project-id web-app                Dispatch and wait for completion
  pentest-ci scan --repo-id 4242 --level full          Full scan for a repo by numeric id
  pentest-ci scan --project-id web-app --no-wait       Dispatch only, do not poll
  pentest-ci scan --project-id web-app --fail-on high  Block the build on high+ issues
  pentest-ci status 3f8a12 --format json               One-shot status check
  pentest-ci doctor                                    Check environment setup

Exit codes: 0 = completed with no blocking issues; 1 = blocking issues found,
dispatch/poll failure, or invalid configuration."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// Flags shared by every command that talks to the API.
#[derive(Args, Debug)]
pub struct ApiArgs {
    /// API key (falls back to the environment)
    #[arg(long, env = API_KEY_VAR, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Target API environment
    #[arg(long = "env", value_name = "ENV", value_parser = ["dev", "staging", "production"])]
    pub environment: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Dispatch a scan and (by default) wait for it to finish
    #[command(after_help = "\
Examples:
  pentest-ci scan --project-id web-app
  pentest-ci scan --repo-id 4242 --branch main --level priority
  pentest-ci scan --project-id web-app --env staging --poll-interval 2000

Inside GitHub Actions or GitLab CI the branch and numeric repo id are
picked up from the pipeline environment when not passed explicitly.")]
    Scan {
        /// Project identifier (conflicts with --repo-id)
        #[arg(long)]
        project_id: Option<String>,

        /// Numeric repository identifier (conflicts with --project-id)
        #[arg(long, conflicts_with = "project_id")]
        repo_id: Option<u64>,

        /// Branch to scan
        #[arg(long)]
        branch: Option<String>,

        /// Scan depth
        #[arg(long, value_parser = ["priority", "full"])]
        level: Option<String>,

        /// Dispatch only; do not poll for completion
        #[arg(long)]
        no_wait: bool,

        /// Delay between status checks, in milliseconds
        #[arg(long, value_name = "MS")]
        poll_interval: Option<u64>,

        /// Exit with code 1 if issues at this severity or above are found
        #[arg(long, value_parser = ["critical", "high", "medium", "low", "info"])]
        fail_on: Option<String>,

        /// Output format for the final record
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        #[command(flatten)]
        api: ApiArgs,
    },

    /// Show the current status of a scan
    Status {
        /// Scan identifier returned at dispatch time
        scan_id: String,

        /// Severity threshold used for the pass/fail verdict
        #[arg(long, value_parser = ["critical", "high", "medium", "low", "info"])]
        fail_on: Option<String>,

        /// Output format
        #[arg(long, short = 'f', default_value = "text", value_parser = ["text", "json"])]
        format: String,

        #[command(flatten)]
        api: ApiArgs,
    },

    /// Check environment setup (API key, CI platform, endpoint)
    Doctor,
}

/// Run the CLI with parsed arguments
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Scan {
            project_id,
            repo_id,
            branch,
            level,
            no_wait,
            poll_interval,
            fail_on,
            format,
            api,
        } => scan::run(scan::ScanArgs {
            project_id,
            repo_id,
            branch,
            level,
            no_wait,
            poll_interval,
            fail_on,
            format,
            api,
        }),

        Commands::Status {
            scan_id,
            fail_on,
            format,
            api,
        } => status::run(&scan_id, fail_on.as_deref(), &format, api),

        Commands::Doctor => doctor::run(),
    }
}
