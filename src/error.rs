//! Error types shared by the API client, polling engine, and orchestrator.

use thiserror::Error;

/// Errors that can occur while dispatching or waiting on a scan.
///
/// All variants propagate synchronously out of the orchestrator; the CLI
/// layer is responsible for printing them and mapping to a non-zero exit
/// code. The core never terminates the process itself.
#[derive(Error, Debug)]
pub enum ScanError {
    /// Missing or contradictory local configuration, detected before any
    /// network call is made.
    #[error("configuration error: {0}")]
    Config(String),

    /// Non-success HTTP response or connection failure. `message` carries
    /// the server-supplied error text when present, otherwise the
    /// transport-level status description.
    #[error("API request failed ({status}): {message}")]
    Transport { status: u16, message: String },

    /// The response body failed structural validation.
    #[error("malformed server response: {0}")]
    Schema(String),

    /// The remote scan reached the `failed` state.
    #[error("scan failed: {0}")]
    RemoteFailure(String),

    /// An operator paused the scan; treated as abnormal termination.
    #[error("scan was paused on the remote service; resume or cancel it from the dashboard")]
    RemotePaused,
}

pub type ScanResult<T> = Result<T, ScanError>;
