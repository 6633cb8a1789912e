//! Tracing setup and log-field helpers
//!
//! The client core only emits `tracing` events; installing a subscriber is
//! left to the embedding application. [`init_tracing`] is the default
//! choice for binaries and tests.

use hmis_domain::HmisError;
use tracing_subscriber::{fmt, EnvFilter};

/// Filter used when `RUST_LOG` is unset or invalid
pub const DEFAULT_FILTER: &str = "info";

/// Output format for [`init_tracing`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable single-line events
    #[default]
    Plain,
    /// One JSON object per event, for log shippers
    Json,
}

/// Install a global `fmt` subscriber filtered by `RUST_LOG`
///
/// Safe to call more than once; later calls leave the first subscriber in
/// place and return `false`.
pub fn init_tracing(format: LogFormat) -> bool {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));

    let installed = match format {
        LogFormat::Plain => fmt().with_env_filter(filter).with_target(true).try_init(),
        LogFormat::Json => fmt().json().with_env_filter(filter).with_current_span(true).try_init(),
    };
    installed.is_ok()
}

/// Stable label for an error, used as the `error_type` log field
#[inline]
pub fn error_label(error: &HmisError) -> &'static str {
    error.label()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn second_init_is_a_no_op() {
        init_tracing(LogFormat::Plain);
        assert!(!init_tracing(LogFormat::Json));
    }

    #[test]
    fn labels_follow_error_kind() {
        assert_eq!(error_label(&HmisError::Transport("reset".into())), "transport");
        assert_eq!(error_label(&HmisError::validation("id", "empty")), "validation");
        let bad_gateway =
            HmisError::HttpStatus { status: 502, url: String::new(), body: String::new() };
        assert_eq!(error_label(&bad_gateway), "http_status");
    }
}
