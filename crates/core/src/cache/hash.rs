//! Deterministic cache key generation.

use std::fmt;

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::Error;

/// Hex-encoded SHA-256 of the serialized key parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Compute the key for a set of query parameters.
    ///
    /// Field order and list order are part of the key, so the same logical
    /// query must be built with the same element order to hit.
    ///
    /// # Errors
    ///
    /// Returns `Error::CacheKey` if the parameters cannot be serialized.
    pub fn from_params<P: Serialize>(params: &P) -> Result<Self, Error> {
        let bytes = serde_json::to_vec(params).map_err(|e| Error::CacheKey(e.to_string()))?;
        let mut hasher = Sha256::new();
        hasher.update(&bytes);
        Ok(Self(hex::encode(hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
