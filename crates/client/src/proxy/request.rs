//! Proxy request types and validation.

use serde::Serialize;

use crate::proxy::ProviderError;

/// Parameters for `GET /api/search`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest {
    /// Query text, possibly carrying `site:` clauses.
    pub q: String,

    /// Single-domain restriction applied by the proxy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,

    /// 1-based pagination offset.
    pub start: u32,
}

impl SearchRequest {
    pub fn new(q: impl Into<String>, start: u32) -> Self {
        Self { q: q.into(), site: None, start }
    }

    pub fn for_site(q: impl Into<String>, site: impl Into<String>, start: u32) -> Self {
        Self { q: q.into(), site: Some(site.into()), start }
    }

    /// Validate the request parameters.
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.q.trim().is_empty() {
            return Err(ProviderError::InvalidQuery("query cannot be empty".to_string()));
        }

        if self.start == 0 {
            return Err(ProviderError::InvalidQuery("start is 1-based".to_string()));
        }

        if let Some(site) = &self.site
            && site.trim().is_empty()
        {
            return Err(ProviderError::InvalidQuery("site cannot be empty".to_string()));
        }

        Ok(())
    }
}

/// Parameters for `GET /api/youtube`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VideoRequest {
    pub q: String,

    #[serde(rename = "channelId")]
    pub channel_id: String,

    /// Videos per channel (1-50).
    #[serde(rename = "maxResults")]
    pub max_results: u8,
}

impl VideoRequest {
    pub fn new(q: impl Into<String>, channel_id: impl Into<String>, max_results: u8) -> Self {
        Self { q: q.into(), channel_id: channel_id.into(), max_results }
    }

    /// Validate the request parameters.
    pub fn validate(&self) -> Result<(), ProviderError> {
        if self.q.trim().is_empty() {
            return Err(ProviderError::InvalidQuery("query cannot be empty".to_string()));
        }

        if self.channel_id.trim().is_empty() {
            return Err(ProviderError::InvalidQuery("channel id cannot be empty".to_string()));
        }

        if !(1..=50).contains(&self.max_results) {
            return Err(ProviderError::InvalidQuery(format!(
                "maxResults must be 1-50, got {}",
                self.max_results
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_search_request() {
        assert!(SearchRequest::new("(site:binbaz.org.sa) wudu", 1).validate().is_ok());
        assert!(SearchRequest::for_site("wudu", "dorar.net", 11).validate().is_ok());
    }

    #[test]
    fn test_empty_query() {
        let req = SearchRequest::new("  ", 1);
        assert!(matches!(req.validate(), Err(ProviderError::InvalidQuery(_))));
    }

    #[test]
    fn test_zero_start() {
        let req = SearchRequest::new("wudu", 0);
        assert!(matches!(req.validate(), Err(ProviderError::InvalidQuery(_))));
    }

    #[test]
    fn test_search_query_string_omits_missing_site() {
        let value = serde_json::to_value(SearchRequest::new("wudu", 1)).unwrap();
        assert_eq!(value, serde_json::json!({"q": "wudu", "start": 1}));
    }

    #[test]
    fn test_video_request_wire_names() {
        let value = serde_json::to_value(VideoRequest::new("tawheed", "UC1", 5)).unwrap();
        assert_eq!(value, serde_json::json!({"q": "tawheed", "channelId": "UC1", "maxResults": 5}));
    }

    #[test]
    fn test_invalid_max_results() {
        for max in [0, 51] {
            let req = VideoRequest::new("tawheed", "UC1", max);
            assert!(req.validate().is_err(), "maxResults {max} should be rejected");
        }
    }
}
