//! Proxy client error types.

use fatwa_core::{Cancelled, Error};

/// Errors from a single proxy call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The proxy could not be reached.
    #[error("network error: {0}")]
    Network(String),

    /// Request timeout, either locally or reported by the proxy.
    #[error("request timeout")]
    Timeout,

    /// Upstream quota exhausted.
    #[error("quota exceeded")]
    QuotaExceeded,

    /// The request was rejected as malformed.
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// The proxy has no upstream credentials.
    #[error("not configured: {0}")]
    NotConfigured(String),

    /// Any other non-success response.
    #[error("HTTP error {status}: {message}")]
    Http { status: u16, message: String },

    /// Response parse error.
    #[error("parse error: {0}")]
    Parse(String),

    /// The call's round was superseded before it settled.
    #[error("cancelled")]
    Cancelled,
}

impl From<reqwest::Error> for ProviderError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() { ProviderError::Timeout } else { ProviderError::Network(err.to_string()) }
    }
}

impl From<Cancelled> for ProviderError {
    fn from(_: Cancelled) -> Self {
        ProviderError::Cancelled
    }
}

/// A provider failure becomes a round failure, unless it only reports
/// that the round was superseded.
impl TryFrom<ProviderError> for Error {
    type Error = Cancelled;

    fn try_from(err: ProviderError) -> Result<Self, Cancelled> {
        Ok(match err {
            ProviderError::Network(msg) => Error::Network(msg),
            ProviderError::Timeout => Error::Timeout("request timed out".into()),
            ProviderError::QuotaExceeded => Error::QuotaExceeded,
            ProviderError::InvalidQuery(msg) => Error::InvalidQuery(msg),
            ProviderError::NotConfigured(msg) => Error::NotConfigured(msg),
            ProviderError::Http { status, message } => Error::Upstream(format!("HTTP {status}: {message}")),
            ProviderError::Parse(msg) => Error::Upstream(format!("malformed response: {msg}")),
            ProviderError::Cancelled => return Err(Cancelled),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fatwa_core::ErrorKind;

    #[test]
    fn test_error_display() {
        let err = ProviderError::Http { status: 502, message: "bad gateway".into() };
        assert!(err.to_string().contains("502"));
        assert_eq!(ProviderError::QuotaExceeded.to_string(), "quota exceeded");
    }

    #[test]
    fn test_conversion_preserves_category() {
        let cases = [
            (ProviderError::Network("refused".into()), ErrorKind::Network),
            (ProviderError::Timeout, ErrorKind::Timeout),
            (ProviderError::QuotaExceeded, ErrorKind::Quota),
            (ProviderError::InvalidQuery("empty".into()), ErrorKind::InvalidQuery),
            (ProviderError::NotConfigured("no key".into()), ErrorKind::Generic),
            (ProviderError::Http { status: 500, message: "boom".into() }, ErrorKind::Generic),
            (ProviderError::Parse("eof".into()), ErrorKind::Generic),
        ];
        for (provider_err, kind) in cases {
            assert_eq!(Error::try_from(provider_err).unwrap().kind(), kind);
        }
    }

    #[test]
    fn test_cancelled_is_not_a_round_error() {
        assert_eq!(Error::try_from(ProviderError::Cancelled).unwrap_err(), Cancelled);
    }
}
