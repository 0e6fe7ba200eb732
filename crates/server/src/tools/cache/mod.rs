//! Cache-related MCP tools.
//!
//! Both tools act on the process-wide result caches and never touch the network.

pub mod clear;
pub mod stats;

pub use clear::{CacheClearParams, CacheTarget, clear_impl};
pub use stats::stats_impl;
