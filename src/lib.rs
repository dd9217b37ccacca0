//! pentest-ci - CI client for a remote security-scanning service
//!
//! Dispatches a pentest scan over HTTP, optionally polls it to a terminal
//! state, and converts the result into a CI pass/fail signal based on a
//! severity threshold. The scan itself runs entirely on the remote
//! service; this crate is the dispatch-and-poll protocol client plus the
//! gating policy.

pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod report;
pub mod runner;

pub use api::{Environment, HttpScanClient, ScanApi, ScanLevel, StatusPoller};
pub use config::{EnvConfig, Overrides, ScanConfig};
pub use error::{ScanError, ScanResult};
pub use models::{
    count_at_or_above, DispatchResult, ScanState, ScanStatus, Severity, SeverityCounts,
};
pub use runner::run_scan;
