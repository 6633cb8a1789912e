//! Transport port
//!
//! The CRUD layer depends on, but does not implement, the shared HTTP
//! client. `hmis-infra` provides the reqwest-backed implementation; tests
//! substitute an in-memory recorder.

use async_trait::async_trait;
use hmis_domain::{HttpMethod, Result};
use serde_json::Value;

/// One request as issued by the CRUD layer.
///
/// `path` is relative to the API base URL and already has its identifier
/// substituted and percent-encoded.
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: HttpMethod,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self { method, path: path.into(), query: Vec::new(), body: None }
    }

    pub fn with_query(mut self, query: Vec<(String, String)>) -> Self {
        self.query = query;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// Port for the shared HTTP client.
///
/// Implementations return the parsed response body (JSON `null` for empty
/// bodies) or an error; the CRUD layer forwards both unchanged.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Issue exactly one request.
    ///
    /// # Errors
    /// `HmisError::Transport` for network failures and timeouts,
    /// `HmisError::HttpStatus` for non-success statuses, `HmisError::Decode`
    /// for bodies that are not JSON.
    async fn execute(&self, request: ApiRequest) -> Result<Value>;
}
