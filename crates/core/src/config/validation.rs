//! Post-load checks on `AppConfig`.

use std::ops::RangeInclusive;

use thiserror::Error;

use crate::config::AppConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration value for {field}: {reason}")]
    Invalid { field: String, reason: String },

    #[error("{field} is not set ({hint})")]
    Missing { field: String, hint: String },
}

impl ConfigError {
    fn invalid(field: &str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid { field: field.to_string(), reason: reason.into() }
    }
}

fn within<T>(field: &str, value: T, range: RangeInclusive<T>) -> Result<(), ConfigError>
where
    T: PartialOrd + std::fmt::Display,
{
    if range.contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("{value} is outside {}..={}", range.start(), range.end()),
        ))
    }
}

fn non_empty<T>(field: &str, items: &[T]) -> Result<(), ConfigError> {
    if items.is_empty() { Err(ConfigError::invalid(field, "must not be empty")) } else { Ok(()) }
}

fn absolute_url(field: &str, value: &str) -> Result<(), ConfigError> {
    url::Url::parse(value)
        .map(|_| ())
        .map_err(|e| ConfigError::invalid(field, format!("{value:?} is not an absolute URL: {e}")))
}

impl AppConfig {
    /// Check ranges and required lists after loading.
    ///
    /// A sweep interval longer than the TTL is allowed but logged, since
    /// expired entries then linger until read.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        within("timeout_ms", self.timeout_ms, 100..=300_000)?;
        if self.user_agent.trim().is_empty() {
            return Err(ConfigError::invalid("user_agent", "must not be blank"));
        }
        within("page_size", self.page_size, 1..=10)?;
        within("videos_per_channel", self.videos_per_channel, 1..=50)?;
        if self.cache_ttl_secs == 0 {
            return Err(ConfigError::invalid("cache_ttl_secs", "entries would expire immediately"));
        }
        non_empty("sites", &self.sites)?;
        non_empty("channels", &self.channels)?;
        absolute_url("proxy_base_url", &self.proxy_base_url)?;
        absolute_url("google_base_url", &self.google_base_url)?;

        if self.cache_sweep_interval_secs > self.cache_ttl_secs {
            tracing::warn!(
                ttl_secs = self.cache_ttl_secs,
                sweep_secs = self.cache_sweep_interval_secs,
                "cache sweep interval exceeds TTL"
            );
        }

        Ok(())
    }
}
