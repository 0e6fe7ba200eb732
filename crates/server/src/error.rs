//! Tool failure mapping for the fatwa-mcp server.
//!
//! Site tools use the categorized search wording carried by
//! `From<Error> for McpError`; video tools only distinguish quota.

use fatwa_core::{Error, messages};
use rmcp::model::ErrorData as McpError;

/// Convert a video round failure into an MCP error.
pub fn video_error(err: Error) -> McpError {
    let message = messages::video_failure(&err);
    err.into_mcp(message)
}

/// Output serialization failed; a bug, not a user error.
pub fn serialize_error(err: &serde_json::Error) -> McpError {
    McpError::internal_error(format!("failed to serialize tool output: {err}"), None)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_quota_message() {
        let err = video_error(Error::QuotaExceeded);
        assert_eq!(err.message, "API quota exceeded. Please try again later.");
        assert_eq!(err.code.0, -32004);
    }

    #[test]
    fn test_video_generic_message() {
        let err = video_error(Error::Network("connection refused".into()));
        assert_eq!(err.message, "Failed to perform search");
        assert!(err.data.unwrap()["detail"].as_str().unwrap().contains("connection refused"));
    }

    #[test]
    fn test_site_errors_use_search_wording() {
        let err: McpError = Error::Timeout("slow".into()).into();
        assert!(err.message.starts_with("Search timed out"));
    }
}
