//! Read-through caching decorator for the account repository.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use common::{AppError, AppResult};
use domain::{Account, AccountChanges, AccountIncrement, LeaderboardEntry, PageRequest};

use super::AccountRepository;
use crate::infra::AccountCache;

/// Wraps a repository with a per-account cache.
///
/// Cache failures are logged and never fail the call. Writes refresh the
/// entry with the row the database returned.
pub struct CachedAccountRepository {
    inner: Arc<dyn AccountRepository>,
    cache: Arc<dyn AccountCache>,
}

impl CachedAccountRepository {
    pub fn new(inner: Arc<dyn AccountRepository>, cache: Arc<dyn AccountCache>) -> Self {
        Self { inner, cache }
    }

    async fn remember(&self, account: &Account) {
        if let Err(e) = self.cache.put(account).await {
            tracing::warn!(user_id = %account.user_id, error = %e, "Failed to cache account");
        }
    }

    async fn forget(&self, user_id: &str) {
        if let Err(e) = self.cache.invalidate(user_id).await {
            tracing::warn!(user_id, error = %e, "Failed to invalidate cached account");
        }
    }

    /// Refresh the cache from a write result.
    async fn after_write(&self, user_id: &str, result: AppResult<Account>) -> AppResult<Account> {
        match &result {
            Ok(account) => self.remember(account).await,
            Err(AppError::NotFound) => self.forget(user_id).await,
            Err(_) => {}
        }
        result
    }
}

#[async_trait]
impl AccountRepository for CachedAccountRepository {
    async fn find_by_id(&self, user_id: &str) -> AppResult<Option<Account>> {
        match self.cache.get(user_id).await {
            Ok(Some(account)) => return Ok(Some(account)),
            Ok(None) => {}
            Err(e) => tracing::warn!(user_id, error = %e, "Account cache read failed"),
        }

        let account = self.inner.find_by_id(user_id).await?;
        if let Some(account) = &account {
            self.remember(account).await;
        }
        Ok(account)
    }

    async fn exists(&self, user_id: &str) -> AppResult<bool> {
        self.inner.exists(user_id).await
    }

    async fn create(&self, account: Account) -> AppResult<Account> {
        let user_id = account.user_id.clone();
        let result = self.inner.create(account).await;
        self.after_write(&user_id, result).await
    }

    async fn update(&self, user_id: &str, changes: AccountChanges) -> AppResult<Account> {
        let result = self.inner.update(user_id, changes).await;
        self.after_write(user_id, result).await
    }

    async fn save(&self, account: Account) -> AppResult<Account> {
        let user_id = account.user_id.clone();
        let result = self.inner.save(account).await;
        self.after_write(&user_id, result).await
    }

    async fn increment(&self, user_id: &str, delta: AccountIncrement) -> AppResult<Account> {
        let result = self.inner.increment(user_id, delta).await;
        self.after_write(user_id, result).await
    }

    async fn list(&self, page: PageRequest) -> AppResult<Vec<Account>> {
        self.inner.list(page).await
    }

    async fn count(&self) -> AppResult<u64> {
        self.inner.count().await
    }

    async fn count_active_since(&self, since: DateTime<Utc>) -> AppResult<u64> {
        self.inner.count_active_since(since).await
    }

    async fn sum_total_earned(&self) -> AppResult<Decimal> {
        self.inner.sum_total_earned().await
    }

    async fn top_by_total_earned(&self, limit: u64) -> AppResult<Vec<LeaderboardEntry>> {
        self.inner.top_by_total_earned(limit).await
    }
}
