//! Error types for roomtel-core.
//!
//! The pipeline is best-effort by design: a transport failure skips the
//! cycle (the scheduler retries on its next tick), a field decode failure
//! becomes the missing marker, and a malformed entity drops only that
//! entity. Nothing here is fatal, and nothing is surfaced to a viewer
//! beyond a value simply not updating. These errors exist for the transport
//! boundary and for configuration mistakes caught at startup.

use thiserror::Error;

/// Errors that can occur in the roomtel pipeline.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The feed endpoint could not be reached.
    #[error("feed not reachable at {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The feed answered with a non-success status.
    #[error("feed returned HTTP {status} for {url}")]
    BadStatus { url: String, status: u16 },

    /// HTTP client construction or response body handling failed.
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// Invalid configuration provided.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    /// Create a configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Self::InvalidConfig(message.into())
    }
}

/// Result type alias using roomtel-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::BadStatus {
            url: "http://node.local/data".to_string(),
            status: 503,
        };
        assert!(err.to_string().contains("503"));
        assert!(err.to_string().contains("/data"));

        let err = Error::invalid_config("poll period must be > 0");
        assert!(err.to_string().contains("poll period"));
    }
}
