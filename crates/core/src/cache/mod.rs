//! In-memory TTL cache for aggregated result sets.
//!
//! Entries are keyed by a deterministic hash of the query parameters that
//! produced them and are valid while `now - stored_at <= ttl`. Expired
//! entries are dropped lazily on read and actively by a periodic sweep.
//!
//! There is no size-based eviction: growth between sweeps is bounded only
//! by the TTL. Site search and video search each get their own instance,
//! so their keys never collide.

pub mod hash;
pub mod ttl;

pub use hash::CacheKey;
pub use ttl::{SweepHandle, TtlCache};
