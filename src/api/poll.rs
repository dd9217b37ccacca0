//! Status polling engine.
//!
//! Repeatedly reads remote status until the job reaches a terminal state.
//! Transitions are owned by the scanning service; this loop only observes.
//! The delay between polls is constant, and there is no internal iteration
//! cap or timeout: scan duration is unpredictable, so the embedding
//! caller (CI step timeout, process signal) is the cancellation backstop.

use crate::api::ScanApi;
use crate::error::{ScanError, ScanResult};
use crate::models::{ScanState, ScanStatus};
use std::time::Duration;
use tracing::info;

pub const DEFAULT_POLL_INTERVAL_MS: u64 = 5000;

pub struct StatusPoller {
    interval: Duration,
}

impl Default for StatusPoller {
    fn default() -> Self {
        Self::new(Duration::from_millis(DEFAULT_POLL_INTERVAL_MS))
    }
}

impl StatusPoller {
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Poll until the scan terminates. Every observed snapshot, terminal
    /// ones included, is delivered to `observer` exactly once, in order,
    /// before this returns. A transport failure on any status request
    /// propagates immediately; non-terminal states are not errors and are
    /// the only thing retried.
    pub fn wait_until_terminal(
        &self,
        api: &dyn ScanApi,
        scan_id: &str,
        observer: &mut dyn FnMut(&ScanStatus),
    ) -> ScanResult<ScanStatus> {
        self.run(api, scan_id, observer, std::thread::sleep)
    }

    fn run(
        &self,
        api: &dyn ScanApi,
        scan_id: &str,
        observer: &mut dyn FnMut(&ScanStatus),
        mut sleep: impl FnMut(Duration),
    ) -> ScanResult<ScanStatus> {
        loop {
            let snapshot = api.status(scan_id)?;
            observer(&snapshot);

            match snapshot.state {
                ScanState::Completed => return Ok(snapshot),
                ScanState::Failed => {
                    let message = snapshot
                        .error_message
                        .filter(|m| !m.is_empty())
                        .unwrap_or_else(|| "no error message from server".to_string());
                    return Err(ScanError::RemoteFailure(message));
                }
                ScanState::Paused => return Err(ScanError::RemotePaused),
                ScanState::Queued | ScanState::Running => {
                    info!(
                        "scan {} is {}, checking again in {}ms",
                        scan_id,
                        snapshot.state,
                        self.interval.as_millis()
                    );
                    sleep(self.interval);
                }
            }
        }
    }
}
