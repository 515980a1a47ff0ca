//! Remote tool invocation with legacy endpoint fallback.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use toolhub_core::{Arguments, InvocationRequest, InvocationResponse, RequestId};
use tracing::debug;

use crate::error::GatewayError;
use crate::health::endpoint;

const PRIMARY_PATH: &str = "mcp/tools/call";
const LEGACY_PATH: &str = "tools/call";

/// Executes `tools/call` against a backend server.
///
/// The primary endpoint is tried first. A non-200 status, a transport
/// failure or an undecodable body moves on to the legacy endpoint, which
/// gets the same envelope and timeout.
#[derive(Debug)]
pub struct RemoteToolInvoker {
    client: Client,
    timeout: Duration,
    request_id: AtomicU64,
}

impl RemoteToolInvoker {
    pub const fn new(client: Client, timeout: Duration) -> Self {
        Self {
            client,
            timeout,
            request_id: AtomicU64::new(1),
        }
    }

    /// Call `tool_name` on the server at `base_url` and unwrap the result.
    pub async fn invoke(
        &self,
        base_url: &str,
        tool_name: &str,
        arguments: &Arguments,
    ) -> Result<Value, GatewayError> {
        let request = InvocationRequest::tools_call(
            Some(self.next_id()),
            tool_name,
            Value::Object(arguments.clone()),
        );

        let primary = endpoint(base_url, PRIMARY_PATH);
        match self.post(&primary, &request).await {
            Ok(envelope) => return envelope.into_result().map_err(GatewayError::from),
            Err(e) => {
                debug!(
                    url = %primary,
                    tool_name = %tool_name,
                    error = %e,
                    "Primary call endpoint failed, trying legacy endpoint"
                );
            }
        }

        let legacy = endpoint(base_url, LEGACY_PATH);
        let envelope = self.post(&legacy, &request).await?;
        envelope.into_result().map_err(GatewayError::from)
    }

    async fn post(
        &self,
        url: &str,
        request: &InvocationRequest,
    ) -> Result<InvocationResponse, GatewayError> {
        let response = self
            .client
            .post(url)
            .json(request)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(GatewayError::HttpStatus {
                status: status.as_u16(),
            });
        }

        response
            .json::<InvocationResponse>()
            .await
            .map_err(|e| GatewayError::MalformedResponse(e.to_string()))
    }

    fn next_id(&self) -> RequestId {
        let id = self.request_id.fetch_add(1, Ordering::SeqCst);
        RequestId::Number(i64::try_from(id).unwrap_or(i64::MAX))
    }
}
