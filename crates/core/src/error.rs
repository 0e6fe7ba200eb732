//! Unified error types for fatwa-search.
//!
//! A round either completes, is superseded, or fails with one of these.
//! Per-item provider failures never reach this type; they are logged and
//! replaced by an empty list inside the aggregators.

use rmcp::model::{ErrorCode, ErrorData as McpError};

/// Round-level errors surfaced to the session layer.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid input parameters (e.g., empty query text).
    #[error("INVALID_INPUT: {0}")]
    InvalidInput(String),

    /// `load more` was requested before any search completed.
    #[error("NO_ACTIVE_SEARCH: start a new search first")]
    NoActiveSearch,

    /// The proxy could not be reached.
    #[error("NETWORK_ERROR: {0}")]
    Network(String),

    /// The proxy or its upstream timed out.
    #[error("TIMEOUT: {0}")]
    Timeout(String),

    /// Upstream quota exhausted.
    #[error("QUOTA_EXCEEDED")]
    QuotaExceeded,

    /// Upstream rejected the query.
    #[error("INVALID_QUERY: {0}")]
    InvalidQuery(String),

    /// The proxy has no API credentials configured.
    #[error("NOT_CONFIGURED: {0}")]
    NotConfigured(String),

    /// Any other upstream failure.
    #[error("UPSTREAM_ERROR: {0}")]
    Upstream(String),

    /// Cache key parameters could not be serialized.
    #[error("CACHE_KEY: {0}")]
    CacheKey(String),
}

/// Closed set of categories a user-facing failure message is chosen from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Quota,
    Timeout,
    InvalidQuery,
    Generic,
}

impl Error {
    /// Category used to pick the user-facing message.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Network(_) => ErrorKind::Network,
            Error::QuotaExceeded => ErrorKind::Quota,
            Error::Timeout(_) => ErrorKind::Timeout,
            Error::InvalidQuery(_) | Error::InvalidInput(_) => ErrorKind::InvalidQuery,
            Error::NoActiveSearch | Error::NotConfigured(_) | Error::Upstream(_) | Error::CacheKey(_) => {
                ErrorKind::Generic
            }
        }
    }

    /// JSON-RPC error code for this error.
    fn code(&self) -> i32 {
        match self {
            Error::InvalidInput(_) => -32602,
            Error::NoActiveSearch => -32001,
            Error::Network(_) => -32002,
            Error::Timeout(_) => -32003,
            Error::QuotaExceeded => -32004,
            Error::InvalidQuery(_) => -32005,
            Error::NotConfigured(_) | Error::Upstream(_) => -32006,
            Error::CacheKey(_) => -32603,
        }
    }

    /// Convert into an MCP error carrying the given user-facing message.
    ///
    /// The technical description is kept in `data.detail`.
    pub fn into_mcp(self, message: &str) -> McpError {
        McpError {
            code: ErrorCode(self.code()),
            message: message.to_string().into(),
            data: Some(serde_json::json!({ "detail": self.to_string() })),
        }
    }
}

impl From<Error> for McpError {
    fn from(err: Error) -> Self {
        let message = crate::messages::search_failure(&err);
        err.into_mcp(message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::InvalidQuery("bad request".to_string());
        assert!(err.to_string().contains("INVALID_QUERY"));
        assert!(err.to_string().contains("bad request"));
        assert_eq!(Error::QuotaExceeded.to_string(), "QUOTA_EXCEEDED");
    }

    #[test]
    fn test_kind_is_closed_match() {
        assert_eq!(Error::Network("refused".into()).kind(), ErrorKind::Network);
        assert_eq!(Error::QuotaExceeded.kind(), ErrorKind::Quota);
        assert_eq!(Error::Timeout("slow".into()).kind(), ErrorKind::Timeout);
        assert_eq!(Error::InvalidQuery("x".into()).kind(), ErrorKind::InvalidQuery);
        assert_eq!(Error::Upstream("boom".into()).kind(), ErrorKind::Generic);
    }

    #[test]
    fn test_not_configured_surfaces_as_generic() {
        let err = Error::NotConfigured("Search API credentials are not configured".into());
        assert_eq!(err.kind(), Error::Upstream("HTTP 500".into()).kind());
    }

    #[test]
    fn test_error_to_mcp_error() {
        let err = Error::QuotaExceeded;
        let mcp_err: McpError = err.into();
        assert_eq!(mcp_err.code.0, -32004);
        assert!(mcp_err.message.contains("quota"));
    }
}
