//! Conversions from external infrastructure errors into domain errors.

use hmis_domain::HmisError;
use reqwest::Error as HttpError;

/// Error newtype that keeps conversions on the infrastructure side and can be
/// converted back into the domain error.
#[derive(Debug)]
pub struct InfraError(pub HmisError);

impl From<InfraError> for HmisError {
    fn from(value: InfraError) -> Self {
        value.0
    }
}

impl From<HmisError> for InfraError {
    fn from(value: HmisError) -> Self {
        InfraError(value)
    }
}

trait IntoHmisError {
    fn into_hmis(self) -> HmisError;
}

/* -------------------------------------------------------------------------- */
/* reqwest::Error → HmisError */
/* -------------------------------------------------------------------------- */

impl IntoHmisError for HttpError {
    fn into_hmis(self) -> HmisError {
        let url = self.url().map(ToString::to_string).unwrap_or_default();

        if self.is_timeout() {
            return HmisError::Transport(format!("HTTP request to {url} timed out"));
        }

        #[cfg(not(target_arch = "wasm32"))]
        if self.is_connect() {
            return HmisError::Transport(format!("HTTP connection to {url} failed"));
        }

        if let Some(status) = self.status() {
            return HmisError::HttpStatus { status: status.as_u16(), url, body: String::new() };
        }

        if self.is_decode() {
            return HmisError::Decode(self.to_string());
        }

        if self.is_builder() {
            return HmisError::Internal(format!("failed to build HTTP request: {self}"));
        }

        HmisError::Transport(self.to_string())
    }
}

impl From<HttpError> for InfraError {
    fn from(value: HttpError) -> Self {
        InfraError(value.into_hmis())
    }
}

/* -------------------------------------------------------------------------- */
/* Tests */
/* -------------------------------------------------------------------------- */
