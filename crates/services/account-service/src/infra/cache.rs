//! Redis account cache.
//!
//! Keeps recently read accounts keyed by `user_id` with a TTL so that hot
//! lookups skip the database.

use async_trait::async_trait;
use redis::{aio::ConnectionManager, AsyncCommands, Client};

use common::{AppError, AppResult, CacheConfig};
use domain::Account;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Cache key prefix for account entries
pub const CACHE_PREFIX_ACCOUNT: &str = "account:";

/// Account cache trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountCache: Send + Sync {
    /// Get cached account by identifier.
    async fn get(&self, user_id: &str) -> AppResult<Option<Account>>;

    /// Store an account, replacing any previous entry.
    async fn put(&self, account: &Account) -> AppResult<()>;

    /// Drop the cached entry for an account.
    async fn invalidate(&self, user_id: &str) -> AppResult<()>;
}

/// Redis cache wrapper with connection pooling.
#[derive(Clone)]
pub struct RedisAccountCache {
    connection: ConnectionManager,
    ttl_seconds: u64,
}

impl RedisAccountCache {
    /// Connect to Redis.
    pub async fn connect(config: &CacheConfig) -> AppResult<Self> {
        let client = Client::open(config.url.as_str())?;
        let connection = ConnectionManager::new(client).await?;

        tracing::info!(ttl_seconds = config.default_ttl_seconds, "Redis cache connected");

        Ok(Self {
            connection,
            ttl_seconds: config.default_ttl_seconds,
        })
    }

    /// Check Redis connectivity.
    pub async fn ping(&self) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _pong: String = redis::cmd("PING").query_async(&mut conn).await?;
        Ok(())
    }
}

/// Build the Redis key for an account.
pub fn cache_key(user_id: &str) -> String {
    format!("{}{}", CACHE_PREFIX_ACCOUNT, user_id)
}

#[async_trait]
impl AccountCache for RedisAccountCache {
    async fn get(&self, user_id: &str) -> AppResult<Option<Account>> {
        let mut conn = self.connection.clone();
        let value: Option<String> = conn.get(cache_key(user_id)).await?;

        match value {
            Some(json) => {
                let parsed = serde_json::from_str(&json).map_err(|e| {
                    AppError::internal(format!("Cache deserialization error: {}", e))
                })?;
                Ok(Some(parsed))
            }
            None => Ok(None),
        }
    }

    async fn put(&self, account: &Account) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let json = serde_json::to_string(account)
            .map_err(|e| AppError::internal(format!("Cache serialization error: {}", e)))?;

        conn.set_ex::<_, _, ()>(cache_key(&account.user_id), json, self.ttl_seconds)
            .await?;

        Ok(())
    }

    async fn invalidate(&self, user_id: &str) -> AppResult<()> {
        let mut conn = self.connection.clone();
        let _: () = conn.del(cache_key(user_id)).await?;
        Ok(())
    }
}
