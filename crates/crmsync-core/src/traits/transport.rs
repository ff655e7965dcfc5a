// # HTTP Transport Trait
//
// Defines the interface for the outbound HTTP exchange.
//
// ## Implementations
//
// - Reqwest-backed: `crmsync-transport-reqwest` crate
// - Scripted doubles: contract tests in this crate
//
// A transport is a single-shot collaborator: one request in, one response
// out. It must not retry, cache, or interpret status codes; the callout
// client owns the success/failure decision.

use async_trait::async_trait;

use crate::error::Result;

/// Header value for JSON request bodies
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// HTTP method of an outbound request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl Method {
    /// Method name for logging
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
        }
    }
}

/// An outbound HTTP request
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// Build a bodyless GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            url: url.into(),
            headers: Vec::new(),
            body: None,
        }
    }

    /// Build a POST request carrying a JSON payload
    ///
    /// Sets the `Content-Type: application/json` header and serializes the
    /// payload compactly into the body.
    pub fn post_json(url: impl Into<String>, payload: &serde_json::Value) -> Self {
        Self {
            method: Method::Post,
            url: url.into(),
            headers: vec![("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string())],
            body: Some(payload.to_string()),
        }
    }
}

/// The response to an outbound HTTP request
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    /// Create a response from a status code and body
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Whether the status is in the 2xx success range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Trait for HTTP transport implementations
///
/// # Thread Safety
///
/// Implementations must be thread-safe and usable across async tasks.
///
/// # Error Contract
///
/// `send` errs **only** when the exchange itself could not complete
/// (connect failure, deadline, broken stream). A response with a
/// non-success status is still `Ok`: status interpretation is owned by
/// [`crate::client::CalloutClient`], never by the transport.
///
/// Implementations must not retry and must not spawn background tasks; one
/// call is one exchange.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Perform one request/response exchange
    ///
    /// # Parameters
    ///
    /// - `request`: The request to send
    ///
    /// # Returns
    ///
    /// - `Ok(HttpResponse)`: The exchange completed (any status code)
    /// - `Err(Error::Transport)`: The exchange could not complete
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse>;

    /// Get the transport name (for logging/debugging)
    fn transport_name(&self) -> &'static str;
}
