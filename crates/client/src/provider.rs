//! Provider seams between the aggregators and the proxy.
//!
//! [`ProxyClient`](crate::ProxyClient) implements both traits; tests swap in
//! in-memory providers.

use async_trait::async_trait;
use fatwa_core::VideoResult;

use crate::proxy::{ProviderError, SearchPage, SearchRequest, VideoRequest};

/// A backend answering one site-restricted search page.
///
/// Implementations must be `Send + Sync` so a round can issue calls
/// concurrently.
#[async_trait]
pub trait SearchProvider: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchPage, ProviderError>;
}

/// A backend answering one channel's video search.
#[async_trait]
pub trait VideoProvider: Send + Sync {
    async fn channel_videos(&self, request: &VideoRequest) -> Result<Vec<VideoResult>, ProviderError>;
}
