//! Bearer token sources for the REST transport

use std::fmt;

use async_trait::async_trait;
use hmis_domain::{HmisError, Result};

/// Trait for providing access tokens
///
/// Called once per request so implementations can refresh transparently.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    async fn access_token(&self) -> Result<String>;
}

/// Fixed token, typically from `HMIS_API_TOKEN`
#[derive(Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    /// # Errors
    /// `HmisError::Config` for a blank token.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        let token = token.into();
        if token.trim().is_empty() {
            return Err(HmisError::Config("API token is empty".into()));
        }
        Ok(Self { token })
    }
}

impl fmt::Debug for StaticTokenProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticTokenProvider").field("token", &"<redacted>").finish()
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self) -> Result<String> {
        Ok(self.token.clone())
    }
}
