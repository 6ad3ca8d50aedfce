//! Account Service Library
//!
//! Persistent store for user accounts (the `users` table): balances kept as
//! exact decimals, referral counters and claim timestamps, with an optional
//! Redis read-through cache.

pub mod config;
pub mod infra;
pub mod repository;
pub mod service;

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use common::{AppResult, CacheConfig};

use crate::config::AccountServiceConfig;
use crate::infra::{AccountCache, Database, RedisAccountCache};
use crate::repository::{AccountRepository, AccountStore, CachedAccountRepository};
use crate::service::{AccountManager, AccountService};

/// Connected store: the service and the cache it reads through, if any.
pub struct AccountServiceContext {
    pub cache: Option<Arc<RedisAccountCache>>,
    pub service: Arc<dyn AccountService>,
}

/// Wire repository, optional cache and service over a connection.
pub fn build_service(
    db: DatabaseConnection,
    cache: Option<Arc<dyn AccountCache>>,
) -> Arc<dyn AccountService> {
    let store: Arc<dyn AccountRepository> = Arc::new(AccountStore::new(db));

    let repo: Arc<dyn AccountRepository> = match cache {
        Some(cache) => Arc::new(CachedAccountRepository::new(store, cache)),
        None => store,
    };

    Arc::new(AccountManager::new(repo))
}

/// Connect to the database and the cache. Pending migrations are not
/// applied here; use [`run_migrations`].
///
/// A cache that cannot be reached is skipped with a warning.
pub async fn connect(config: &AccountServiceConfig) -> AppResult<AccountServiceContext> {
    let database = Database::connect_without_migrations(&config.database).await?;

    let cache = match check_cache(config.cache.as_ref()).await {
        Ok(CacheStatus::Reachable(cache)) => Some(Arc::new(cache)),
        Ok(CacheStatus::Disabled) => {
            info!("No Redis URL configured, account cache disabled");
            None
        }
        Err(e) => {
            warn!(error = %e, "Account cache unavailable, continuing without it");
            None
        }
    };

    let service = build_service(
        database.into_connection(),
        cache.clone().map(|c| c as Arc<dyn AccountCache>),
    );

    Ok(AccountServiceContext { cache, service })
}

/// Outcome of probing the configured cache.
pub enum CacheStatus {
    /// No Redis URL is configured
    Disabled,
    /// Connected and answered `PING`
    Reachable(RedisAccountCache),
}

/// Connect to and ping the configured cache.
///
/// A configured cache that cannot be reached is an error, never `Disabled`.
pub async fn check_cache(config: Option<&CacheConfig>) -> AppResult<CacheStatus> {
    let Some(config) = config else {
        return Ok(CacheStatus::Disabled);
    };

    let cache = RedisAccountCache::connect(config).await?;
    cache.ping().await?;
    Ok(CacheStatus::Reachable(cache))
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(config: &AccountServiceConfig, action: MigrateAction) -> AppResult<()> {
    let db = Database::connect_without_migrations(&config.database).await?;

    match action {
        MigrateAction::Up => {
            db.run_migrations().await?;
            info!("Migrations applied successfully");
        }
        MigrateAction::Down => {
            db.rollback_migration().await?;
            info!("Rolled back last migration");
        }
        MigrateAction::Status => {
            let status = db.migration_status().await?;
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }
        MigrateAction::Fresh => {
            db.fresh_migrations().await?;
            info!("Database reset and migrations applied");
        }
    }

    db.close().await?;
    Ok(())
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
