//! Transport failure types for probe requests.
//!
//! These never leave the crate through [`podcheck_core::Probe::exists`]; they
//! are visible only through [`super::HttpProbe::head`] for diagnostics.

use std::sync::Arc;

use super::url::UrlError;

/// Errors from a single HEAD probe.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ProbeError {
    /// Rendered URL could not be turned into a request.
    #[error("invalid probe URL: {0}")]
    InvalidUrl(#[from] UrlError),

    /// Request timeout.
    #[error("request timeout")]
    Timeout,

    /// Redirect chain exceeded the configured cap.
    #[error("too many redirects")]
    TooManyRedirects,

    /// DNS, connection, TLS or protocol failure.
    #[error("network error: {0}")]
    Network(Arc<reqwest::Error>),
}

impl From<reqwest::Error> for ProbeError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ProbeError::Timeout
        } else if err.is_redirect() {
            ProbeError::TooManyRedirects
        } else {
            ProbeError::Network(Arc::new(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ProbeError::InvalidUrl(UrlError::Empty);
        assert!(err.to_string().contains("invalid probe URL"));

        assert_eq!(ProbeError::TooManyRedirects.to_string(), "too many redirects");
    }
}
