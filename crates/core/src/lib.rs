//! Core types and shared functionality for fatwa-search.
//!
//! This crate provides:
//! - In-memory TTL cache with deterministic keys and a periodic sweeper
//! - Unified error types and user-facing messages
//! - Configuration structures
//! - The result model, query configuration, result filter, and the
//!   per-session round lifecycle shared by both aggregators

pub mod cache;
pub mod config;
pub mod error;
pub mod filter;
pub mod lifecycle;
pub mod messages;
pub mod model;
pub mod query;

pub use cache::{CacheKey, SweepHandle, TtlCache};
pub use config::{AppConfig, ConfigError};
pub use error::{Error, ErrorKind};
pub use filter::{FilterSet, Filterable};
pub use lifecycle::{Cancelled, Round, RoundController, RoundOutcome};
pub use messages::{Language, Notice};
pub use model::{SearchResult, VideoResult};
pub use query::{SearchKey, SiteQuery, SpecialSite, SpecialSiteFlags, VideoKey};
