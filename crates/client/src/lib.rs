//! Client code for fatwa-search.
//!
//! This crate provides the proxy HTTP client and the search and video
//! aggregators that fan out over it, shared by the MCP server.

pub mod aggregate;
pub mod provider;
pub mod proxy;

pub use aggregate::{ChannelFacet, RoundReport, SearchAggregator, Snapshot, VideoAggregator};
pub use provider::{SearchProvider, VideoProvider};
pub use proxy::{ProviderError, ProxyClient, ProxyConfig, SearchPage, SearchRequest, VideoRequest};
