//! Two-tier liveness probe for backend servers.
//!
//! Probing is pull-based: nothing runs in the background. Each probe first
//! asks the dedicated health endpoint and, when that endpoint is missing or
//! unreachable, falls back to a `tools/list` protocol request.

use reqwest::{Client, StatusCode};
use std::time::Duration;
use toolhub_core::{InvocationRequest, RequestId, ServerStatus};
use tracing::debug;

/// Correlation id sent with protocol-level probes.
const PROBE_REQUEST_ID: &str = "health_check";

/// Outcome of the first probe tier.
enum HealthEndpoint {
    Ok,
    Failed(StatusCode),
    Missing,
}

/// Probes a server's liveness over HTTP.
#[derive(Debug, Clone)]
pub struct HealthProber {
    client: Client,
    timeout: Duration,
}

impl HealthProber {
    /// Create a prober sharing `client`, bounding each request by `timeout`.
    pub const fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Compute the status of the server at `base_url`.
    ///
    /// Never fails: every transport problem maps to a status.
    pub async fn probe(&self, base_url: &str) -> ServerStatus {
        match self.check_health_endpoint(base_url).await {
            HealthEndpoint::Ok => ServerStatus::Online,
            HealthEndpoint::Failed(status) => {
                debug!(url = %base_url, status = %status, "Health endpoint reported failure");
                ServerStatus::Error
            }
            HealthEndpoint::Missing => self.check_tools_list(base_url).await,
        }
    }

    async fn check_health_endpoint(&self, base_url: &str) -> HealthEndpoint {
        let url = endpoint(base_url, "health");
        match self.client.get(&url).timeout(self.timeout).send().await {
            Ok(response) => match response.status() {
                StatusCode::OK => HealthEndpoint::Ok,
                // No dedicated health route: try the protocol probe instead.
                StatusCode::NOT_FOUND | StatusCode::METHOD_NOT_ALLOWED => HealthEndpoint::Missing,
                other => HealthEndpoint::Failed(other),
            },
            Err(e) => {
                debug!(url = %url, error = %e, "Health endpoint unreachable");
                HealthEndpoint::Missing
            }
        }
    }

    async fn check_tools_list(&self, base_url: &str) -> ServerStatus {
        let url = endpoint(base_url, "mcp/tools/list");
        let request = InvocationRequest::tools_list(Some(RequestId::from(PROBE_REQUEST_ID)));
        match self
            .client
            .post(&url)
            .json(&request)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) if response.status() == StatusCode::OK => ServerStatus::Online,
            Ok(response) => {
                debug!(url = %url, status = %response.status(), "tools/list probe rejected");
                ServerStatus::Offline
            }
            Err(e) => {
                debug!(url = %url, error = %e, "tools/list probe failed");
                ServerStatus::Offline
            }
        }
    }
}

/// Join a server base URL and a path.
pub(crate) fn endpoint(base_url: &str, path: &str) -> String {
    format!("{}/{path}", base_url.trim_end_matches('/'))
}
