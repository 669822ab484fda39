/// Error types for the Coinbase wrapped-assets SDK.
///
/// HTTP failures are split by status class so the retry loop can tell a
/// transient failure (429, 5xx, transport) from a fatal client error.
use std::time::Duration;

use thiserror::Error;

/// The primary error type for the SDK.
#[derive(Error, Debug)]
pub enum WrappedError {
    // Status-classified HTTP failures
    #[error("Retryable HTTP error {status}: {body}")]
    RetryableStatus { status: u16, body: String },

    #[error("HTTP error {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("Request failed after {attempts} attempts: {last}")]
    RetriesExhausted {
        attempts: u32,
        last: Box<WrappedError>,
    },

    // Conversion tracking
    #[error("Conversion {conversion_id} did not complete within {timeout:?}")]
    PollTimeout {
        conversion_id: String,
        timeout: Duration,
    },

    #[error("No conversion_id returned: {0}")]
    MissingConversionId(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    // Transport errors
    #[error("HTTP transport error: {0}")]
    HttpError(String),

    #[error("JSON error: {0}")]
    JsonError(String),

    // Setup errors
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl WrappedError {
    /// Classify a non-success HTTP status into a retryable or fatal error.
    ///
    /// Returns `None` for statuses in the 200–399 success range.
    pub fn from_status(status: u16, body: String) -> Option<Self> {
        match status {
            200..=399 => None,
            429 => Some(WrappedError::RetryableStatus { status, body }),
            s if s >= 500 => Some(WrappedError::RetryableStatus { status, body }),
            _ => Some(WrappedError::HttpStatus { status, body }),
        }
    }

    /// Returns the HTTP status code when the error came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            WrappedError::RetryableStatus { status, .. }
            | WrappedError::HttpStatus { status, .. } => Some(*status),
            WrappedError::RetriesExhausted { last, .. } => last.status(),
            _ => None,
        }
    }

    /// Returns true if the same request may be sent again.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            WrappedError::RetryableStatus { .. } | WrappedError::HttpError(_)
        )
    }

    /// Returns true if a conversion was still in flight when polling gave up.
    pub fn is_poll_timeout(&self) -> bool {
        matches!(self, WrappedError::PollTimeout { .. })
    }
}

impl From<reqwest::Error> for WrappedError {
    fn from(err: reqwest::Error) -> Self {
        // Builder errors (bad header value, bad URL) are not transient.
        if err.is_builder() {
            WrappedError::ConfigError(format!("Invalid request: {err}"))
        } else {
            WrappedError::HttpError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for WrappedError {
    fn from(err: serde_json::Error) -> Self {
        WrappedError::JsonError(err.to_string())
    }
}

impl From<url::ParseError> for WrappedError {
    fn from(err: url::ParseError) -> Self {
        WrappedError::ConfigError(format!("URL parse error: {err}"))
    }
}
