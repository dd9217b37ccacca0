//! HTTP client for the scanning service. Sync via ureq, no async runtime.

use crate::api::{DispatchRequest, ScanApi};
use crate::error::{ScanError, ScanResult};
use crate::models::{DispatchResult, ScanStatus};
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

/// Success payload of `POST /ci/dispatch`. The `status` field is accepted
/// but not part of the returned identity; status is re-read when polling.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct DispatchResponse {
    scan_id: String,
    label: String,
    #[allow(dead_code)]
    status: String,
    #[serde(default)]
    #[allow(dead_code)]
    error: Option<String>,
}

/// Error envelope some non-success responses carry.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

pub struct HttpScanClient {
    agent: ureq::Agent,
    base_url: String,
    api_key: String,
}

fn make_agent() -> ureq::Agent {
    ureq::config::Config::builder()
        .http_status_as_error(false) // We handle status codes ourselves
        .timeout_global(Some(Duration::from_secs(30)))
        .build()
        .new_agent()
}

/// Build the user-facing message for a non-success response: prefer the
/// server-supplied error text, fall back to the HTTP status description.
fn server_error_message(status: u16, body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorBody>(body) {
        if let Some(message) = envelope.error.filter(|m| !m.is_empty()) {
            return message;
        }
    }
    ureq::http::StatusCode::from_u16(status)
        .ok()
        .and_then(|s| s.canonical_reason())
        .unwrap_or("unexpected response")
        .to_string()
}

impl HttpScanClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            agent: make_agent(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    fn fail_for_status(status: u16, body: &str) -> ScanError {
        ScanError::Transport {
            status,
            message: server_error_message(status, body),
        }
    }
}

impl ScanApi for HttpScanClient {
    fn dispatch(&self, request: &DispatchRequest) -> ScanResult<DispatchResult> {
        // No pointless round trip when the target is unresolvable.
        if !request.has_target() {
            return Err(ScanError::Config(
                "either a project id or a repo id is required to dispatch a scan".to_string(),
            ));
        }

        let url = format!("{}/ci/dispatch", self.base_url);
        debug!("POST {}", url);

        let response = self
            .agent
            .post(&url)
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .send_json(request)
            .map_err(|e| ScanError::Transport {
                status: 0,
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.into_body().read_to_string().unwrap_or_default();
            return Err(Self::fail_for_status(status, &body));
        }

        let parsed: DispatchResponse = response
            .into_body()
            .read_json()
            .map_err(|e| ScanError::Schema(e.to_string()))?;

        Ok(DispatchResult {
            scan_id: parsed.scan_id,
            label: parsed.label,
        })
    }

    fn status(&self, scan_id: &str) -> ScanResult<ScanStatus> {
        let url = format!("{}/ci/status/{}", self.base_url, scan_id);
        debug!("GET {}", url);

        let response = self
            .agent
            .get(&url)
            .header("x-api-key", &self.api_key)
            .call()
            .map_err(|e| ScanError::Transport {
                status: 0,
                message: e.to_string(),
            })?;

        let status = response.status().as_u16();
        if status >= 400 {
            let body = response.into_body().read_to_string().unwrap_or_default();
            return Err(Self::fail_for_status(status, &body));
        }

        response
            .into_body()
            .read_json()
            .map_err(|e| ScanError::Schema(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dispatch_without_target_fails_before_any_request() {
        // Unroutable base URL: a network attempt would error as Transport,
        // not Config.
        let client = HttpScanClient::new("http://127.0.0.1:1", "key");
        let err = client.dispatch(&DispatchRequest::default()).unwrap_err();
        assert!(matches!(err, ScanError::Config(_)));
    }

    #[test]
    fn dispatch_payload_requires_identity_fields() {
        let parsed: DispatchResponse =
            serde_json::from_str(r#"{"scanId": "s1", "label": "L", "status": "queued"}"#).unwrap();
        assert_eq!(parsed.scan_id, "s1");
        assert_eq!(parsed.label, "L");

        // Identity fields missing -> schema violation, not partial data.
        assert!(serde_json::from_str::<DispatchResponse>(r#"{"scanId": "s1"}"#).is_err());
        assert!(serde_json::from_str::<DispatchResponse>(r#"{"label": "L"}"#).is_err());
    }

    #[test]
    fn server_error_message_prefers_error_field() {
        let message = server_error_message(403, r#"{"error": "API key revoked"}"#);
        assert_eq!(message, "API key revoked");
    }

    #[test]
    fn server_error_message_falls_back_to_status_text() {
        assert_eq!(server_error_message(404, "not json"), "Not Found");
        assert_eq!(server_error_message(503, r#"{"error": ""}"#), "Service Unavailable");
        assert_eq!(server_error_message(599, "{}"), "unexpected response");
    }
}
