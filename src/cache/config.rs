//! Cache configuration.

use std::time::Duration;

use serde::Deserialize;

const DEFAULT_TTL_SECONDS: u64 = 300;

/// Cache configuration from `mostinger.toml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Enable the feed cache. When disabled every read assembles fresh.
    pub enabled: bool,
    /// Time-to-live for cached feed payloads, in seconds. This is the hard
    /// upper bound on staleness when invalidation is skipped or races.
    pub ttl_seconds: u64,
    /// Redis connection URL. When absent the in-process store is used.
    pub url: Option<String>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_seconds: DEFAULT_TTL_SECONDS,
            url: None,
        }
    }
}

impl CacheConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_seconds.max(1))
    }
}

impl From<&crate::config::CacheSettings> for CacheConfig {
    fn from(settings: &crate::config::CacheSettings) -> Self {
        Self {
            enabled: settings.enabled,
            ttl_seconds: settings.ttl_seconds,
            url: settings.url.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_values() {
        let config = CacheConfig::default();
        assert!(config.enabled);
        assert_eq!(config.ttl_seconds, 300);
        assert!(config.url.is_none());
    }

    #[test]
    fn ttl_clamps_zero_to_one_second() {
        let config = CacheConfig {
            ttl_seconds: 0,
            ..Default::default()
        };
        assert_eq!(config.ttl(), Duration::from_secs(1));
    }
}
