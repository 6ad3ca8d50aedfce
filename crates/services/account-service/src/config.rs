//! Account service configuration.

use std::env;

use common::{CacheConfig, DatabaseConfig};

/// Account service configuration.
#[derive(Debug, Clone)]
pub struct AccountServiceConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Redis settings; `None` disables the read-through cache
    pub cache: Option<CacheConfig>,
}

impl AccountServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let db_defaults = DatabaseConfig::default();
        let cache_defaults = CacheConfig::default();

        let database = DatabaseConfig {
            url: env::var("ACCOUNT_SERVICE_DATABASE_URL")
                .or_else(|_| env::var("DATABASE_URL"))
                .unwrap_or(db_defaults.url),
            max_connections: parse_var("DATABASE_MAX_CONNECTIONS")
                .unwrap_or(db_defaults.max_connections),
            min_connections: parse_var("DATABASE_MIN_CONNECTIONS")
                .unwrap_or(db_defaults.min_connections),
            connect_timeout_secs: parse_var("DATABASE_CONNECT_TIMEOUT_SECS")
                .unwrap_or(db_defaults.connect_timeout_secs),
        };

        let cache = env::var("ACCOUNT_SERVICE_REDIS_URL")
            .or_else(|_| env::var("REDIS_URL"))
            .ok()
            .filter(|url| !url.is_empty())
            .map(|url| CacheConfig {
                url,
                default_ttl_seconds: parse_var("ACCOUNT_CACHE_TTL_SECONDS")
                    .unwrap_or(cache_defaults.default_ttl_seconds),
            });

        Self { database, cache }
    }
}

fn parse_var<T: std::str::FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}

impl Default for AccountServiceConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            cache: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_no_cache() {
        let config = AccountServiceConfig::default();
        assert!(config.cache.is_none());
        assert_eq!(config.database.max_connections, 20);
    }
}
