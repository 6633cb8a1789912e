//! Error types used throughout the client core

use hmis_common::validation::ValidationError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Main error type for the HMIS client core
///
/// `Validation` and `InvalidArgument` are raised locally and never reach the
/// network. `Transport` and `HttpStatus` come from the shared HTTP client and
/// are handed to callers unchanged.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "details")]
pub enum HmisError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Validation(ValidationError),

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("{url} returned status {status}")]
    HttpStatus { status: u16, url: String, body: String },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Coarse classification of an [`HmisError`] for UI and logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCategory {
    /// Rejected locally before any request was issued
    Validation,
    /// 401 / 403
    Authentication,
    /// 404
    NotFound,
    /// 429
    RateLimit,
    /// Other 4xx
    Client,
    /// 5xx
    Server,
    /// Connection failures, timeouts, undecodable bodies
    Network,
    /// Misconfiguration or internal faults
    Config,
}

impl HmisError {
    /// Build a validation error for a single field
    pub fn validation(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Validation(ValidationError::field(field, reason))
    }

    /// Get the error category for this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::InvalidArgument(_) | Self::Validation(_) => ErrorCategory::Validation,
            Self::HttpStatus { status, .. } => match *status {
                401 | 403 => ErrorCategory::Authentication,
                404 => ErrorCategory::NotFound,
                429 => ErrorCategory::RateLimit,
                500..=599 => ErrorCategory::Server,
                400..=499 => ErrorCategory::Client,
                _ => ErrorCategory::Network,
            },
            Self::Transport(_) | Self::Decode(_) => ErrorCategory::Network,
            Self::Config(_) | Self::Internal(_) => ErrorCategory::Config,
        }
    }

    /// Whether a user-initiated retry could plausibly succeed
    ///
    /// Nothing in this workspace retries on its own at the CRUD layer; this is
    /// a hint for the UI deciding whether to offer a retry action.
    pub fn is_transient(&self) -> bool {
        matches!(
            self.category(),
            ErrorCategory::Network | ErrorCategory::Server | ErrorCategory::RateLimit
        )
    }

    /// HTTP status carried by the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Stable label suitable for log fields
    pub fn label(&self) -> &'static str {
        match self {
            Self::InvalidArgument(_) => "invalid_argument",
            Self::Validation(_) => "validation",
            Self::Transport(_) => "transport",
            Self::HttpStatus { .. } => "http_status",
            Self::Decode(_) => "decode",
            Self::Config(_) => "config",
            Self::Internal(_) => "internal",
        }
    }
}

impl From<ValidationError> for HmisError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

/// Result type alias for HMIS operations
pub type Result<T> = std::result::Result<T, HmisError>;
