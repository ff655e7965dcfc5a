// # Reqwest HTTP Transport
//
// This crate provides a reqwest-backed HttpTransport implementation for the
// CRM sync system.
//
// ## Behavior
//
// - Makes one HTTP request per `send` call
// - Passes status codes and bodies through untranslated; interpreting them
//   is owned by the callout client
// - Maps connect/deadline/stream failures to `Error::Transport`
// - ❌ NO retry logic (a failed record is re-driven by a future mutation)
// - ❌ NO caching and no background tasks
//
// The request deadline is the only timeout in the system; there is no
// retry tier above it.

use std::time::Duration;

use async_trait::async_trait;

use crmsync_core::error::{Error, Result};
use crmsync_core::traits::{HttpRequest, HttpResponse, HttpTransport, Method};

/// Default deadline for a single request/response exchange
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Reqwest-backed HTTP transport
///
/// Cheap to construct and to clone; the inner reqwest client pools
/// connections internally.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Create a transport with the default request deadline
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_REQUEST_TIMEOUT)
    }

    /// Create a transport with a custom request deadline
    pub fn with_timeout(timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();
        Self { client }
    }
}

impl Default for ReqwestTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse> {
        tracing::debug!("{} {}", request.method.as_str(), request.url);

        let mut builder = match request.method {
            Method::Get => self.client.get(&request.url),
            Method::Post => self.client.post(&request.url),
        };
        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::transport(format!("request failed: {}", e)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| Error::transport(format!("failed to read response body: {}", e)))?;

        Ok(HttpResponse::new(status, body))
    }

    fn transport_name(&self) -> &'static str {
        "reqwest"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_name_is_stable() {
        assert_eq!(ReqwestTransport::new().transport_name(), "reqwest");
    }

    #[test]
    fn default_matches_new() {
        // Both construct a client with the default deadline; neither panics
        let _ = ReqwestTransport::default();
        let _ = ReqwestTransport::with_timeout(Duration::from_secs(5));
    }
}
