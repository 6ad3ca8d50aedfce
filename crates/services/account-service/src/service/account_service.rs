//! Account service - validation and use cases over the account store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::sync::Arc;

use common::{AppError, AppResult};
use domain::{
    activity_cutoff, validate_user_id, Account, AccountChanges, AccountIncrement, AccountStats,
    LeaderboardEntry, NewAccount, PageRequest, DEFAULT_LEADERBOARD_SIZE, MAX_PAGE_SIZE,
};

use crate::repository::AccountRepository;

/// Account service trait for dependency injection.
#[async_trait]
pub trait AccountService: Send + Sync {
    /// Get account by identifier
    async fn get_account(&self, user_id: &str) -> AppResult<Account>;

    /// Check whether an account exists
    async fn account_exists(&self, user_id: &str) -> AppResult<bool>;

    /// Create a new account with declared defaults for omitted fields
    async fn create_account(&self, new: NewAccount) -> AppResult<Account>;

    /// Update mutable fields of an existing account
    async fn update_account(&self, user_id: &str, changes: AccountChanges) -> AppResult<Account>;

    /// Insert the account or overwrite an existing one (join date is kept)
    async fn save_account(&self, account: Account) -> AppResult<Account>;

    /// Atomically add to balance, lifetime earnings and referral count
    async fn increment_account(
        &self,
        user_id: &str,
        delta: AccountIncrement,
    ) -> AppResult<Account>;

    /// List one batch of accounts
    async fn list_accounts(&self, page: PageRequest) -> AppResult<Vec<Account>>;

    /// Count all accounts
    async fn count_accounts(&self) -> AppResult<u64>;

    /// Top earners; a limit of zero means the default size
    async fn leaderboard(&self, limit: u64) -> AppResult<Vec<LeaderboardEntry>>;

    /// Store-wide totals as of `now`
    async fn stats(&self, now: DateTime<Utc>, window_hours: Option<i64>) -> AppResult<AccountStats>;
}

/// Concrete implementation of AccountService using repository.
pub struct AccountManager {
    repo: Arc<dyn AccountRepository>,
}

impl AccountManager {
    /// Create new account service instance with repository
    pub fn new(repo: Arc<dyn AccountRepository>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl AccountService for AccountManager {
    async fn get_account(&self, user_id: &str) -> AppResult<Account> {
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or(AppError::NotFound)
    }

    async fn account_exists(&self, user_id: &str) -> AppResult<bool> {
        self.repo.exists(user_id).await
    }

    async fn create_account(&self, new: NewAccount) -> AppResult<Account> {
        new.check()?;

        // Check if identifier already exists; the primary key still guards races
        if self.repo.exists(&new.user_id).await? {
            return Err(AppError::conflict("Account"));
        }

        let account = Account::from_new(new, Utc::now());
        let created = self.repo.create(account).await?;
        tracing::info!(user_id = %created.user_id, "Account created");
        Ok(created)
    }

    async fn update_account(&self, user_id: &str, changes: AccountChanges) -> AppResult<Account> {
        validate_user_id("user_id", user_id)?;
        changes.check()?;
        self.repo.update(user_id, changes).await
    }

    async fn save_account(&self, account: Account) -> AppResult<Account> {
        account.validate_fields()?;
        self.repo.save(account).await
    }

    async fn increment_account(
        &self,
        user_id: &str,
        delta: AccountIncrement,
    ) -> AppResult<Account> {
        validate_user_id("user_id", user_id)?;
        self.repo.increment(user_id, delta).await
    }

    async fn list_accounts(&self, page: PageRequest) -> AppResult<Vec<Account>> {
        self.repo.list(page).await
    }

    async fn count_accounts(&self) -> AppResult<u64> {
        self.repo.count().await
    }

    async fn leaderboard(&self, limit: u64) -> AppResult<Vec<LeaderboardEntry>> {
        let limit = match limit {
            0 => DEFAULT_LEADERBOARD_SIZE,
            n => n.min(MAX_PAGE_SIZE),
        };
        self.repo.top_by_total_earned(limit).await
    }

    async fn stats(&self, now: DateTime<Utc>, window_hours: Option<i64>) -> AppResult<AccountStats> {
        let since = activity_cutoff(now, window_hours);

        let (total_accounts, active_accounts, total_earned) = tokio::try_join!(
            self.repo.count(),
            self.repo.count_active_since(since),
            self.repo.sum_total_earned(),
        )?;

        Ok(AccountStats {
            total_accounts,
            active_accounts,
            total_earned,
        })
    }
}
