//! Account repository implementation.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Unchanged, ColumnTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Set, SqlErr,
};

use super::entities::account::{self, ActiveModel, Entity as AccountEntity};
use common::{AppError, AppResult};
use domain::{Account, AccountChanges, AccountIncrement, LeaderboardEntry, PageRequest};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Account repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Find account by identifier
    async fn find_by_id(&self, user_id: &str) -> AppResult<Option<Account>>;

    /// Check whether an account with this identifier exists
    async fn exists(&self, user_id: &str) -> AppResult<bool>;

    /// Insert a new account; a duplicate identifier yields `Conflict`
    async fn create(&self, account: Account) -> AppResult<Account>;

    /// Write the given mutable fields of an existing account
    async fn update(&self, user_id: &str, changes: AccountChanges) -> AppResult<Account>;

    /// Insert or overwrite every mutable field, keeping an existing join date
    async fn save(&self, account: Account) -> AppResult<Account>;

    /// Add deltas to balance, lifetime earnings and referral count in one statement
    async fn increment(&self, user_id: &str, delta: AccountIncrement) -> AppResult<Account>;

    /// List accounts ordered by join date
    async fn list(&self, page: PageRequest) -> AppResult<Vec<Account>>;

    /// Count all accounts
    async fn count(&self) -> AppResult<u64>;

    /// Count accounts whose last claim is after `since`
    async fn count_active_since(&self, since: DateTime<Utc>) -> AppResult<u64>;

    /// Exact sum of lifetime earnings across all accounts
    async fn sum_total_earned(&self) -> AppResult<Decimal>;

    /// Highest lifetime earners first
    async fn top_by_total_earned(&self, limit: u64) -> AppResult<Vec<LeaderboardEntry>>;
}

/// Concrete implementation of AccountRepository backed by SeaORM
pub struct AccountStore {
    db: DatabaseConnection,
}

impl AccountStore {
    /// Create new repository instance
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Consume the store, returning its connection
    pub fn into_inner(self) -> DatabaseConnection {
        self.db
    }
}

/// Map insert failures, turning a primary key violation into `Conflict`.
fn map_insert_error(err: DbErr) -> AppError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => AppError::conflict("Account"),
        _ => AppError::from(err),
    }
}

/// Columns an upsert overwrites; `user_id` and `join_date` are left alone.
const UPSERT_COLUMNS: [account::Column; 8] = [
    account::Column::Username,
    account::Column::Balance,
    account::Column::TotalEarned,
    account::Column::Referrals,
    account::Column::LastClaim,
    account::Column::LastDaily,
    account::Column::Wallet,
    account::Column::ReferredBy,
];

#[async_trait]
impl AccountRepository for AccountStore {
    async fn find_by_id(&self, user_id: &str) -> AppResult<Option<Account>> {
        let result = AccountEntity::find_by_id(user_id.to_owned())
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.map(Account::from))
    }

    async fn exists(&self, user_id: &str) -> AppResult<bool> {
        let count = AccountEntity::find_by_id(user_id.to_owned())
            .count(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(count > 0)
    }

    async fn create(&self, account: Account) -> AppResult<Account> {
        let model = ActiveModel::from(account)
            .insert(&self.db)
            .await
            .map_err(map_insert_error)?;

        Ok(Account::from(model))
    }

    async fn update(&self, user_id: &str, changes: AccountChanges) -> AppResult<Account> {
        if changes.is_empty() {
            return self.find_by_id(user_id).await?.ok_or(AppError::NotFound);
        }

        // Only touched columns are written, so concurrent writers of other
        // columns are not overwritten
        let mut active = ActiveModel {
            user_id: Unchanged(user_id.to_owned()),
            ..Default::default()
        };

        if let Some(username) = changes.username {
            active.username = Set(username);
        }
        if let Some(balance) = changes.balance {
            active.balance = Set(balance.into_inner());
        }
        if let Some(total_earned) = changes.total_earned {
            active.total_earned = Set(total_earned.into_inner());
        }
        if let Some(referrals) = changes.referrals {
            active.referrals = Set(referrals);
        }
        if let Some(last_claim) = changes.last_claim {
            active.last_claim = Set(last_claim);
        }
        if let Some(last_daily) = changes.last_daily {
            active.last_daily = Set(last_daily);
        }
        if let Some(wallet) = changes.wallet {
            active.wallet = Set(wallet);
        }
        if let Some(referred_by) = changes.referred_by {
            active.referred_by = Set(referred_by);
        }

        let model = active.update(&self.db).await.map_err(|e| match e {
            DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => AppError::NotFound,
            other => AppError::from(other),
        })?;

        Ok(Account::from(model))
    }

    async fn save(&self, account: Account) -> AppResult<Account> {
        let model = AccountEntity::insert(ActiveModel::from(account))
            .on_conflict(
                OnConflict::column(account::Column::UserId)
                    .update_columns(UPSERT_COLUMNS)
                    .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(Account::from(model))
    }

    async fn increment(&self, user_id: &str, delta: AccountIncrement) -> AppResult<Account> {
        if delta.is_empty() {
            return self.find_by_id(user_id).await?.ok_or(AppError::NotFound);
        }

        let models = AccountEntity::update_many()
            .col_expr(
                account::Column::Balance,
                Expr::col(account::Column::Balance).add(delta.balance.into_inner()),
            )
            .col_expr(
                account::Column::TotalEarned,
                Expr::col(account::Column::TotalEarned).add(delta.total_earned.into_inner()),
            )
            .col_expr(
                account::Column::Referrals,
                Expr::col(account::Column::Referrals).add(delta.referrals),
            )
            .filter(account::Column::UserId.eq(user_id))
            .exec_with_returning(&self.db)
            .await
            .map_err(AppError::from)?;

        models
            .into_iter()
            .next()
            .map(Account::from)
            .ok_or(AppError::NotFound)
    }

    async fn list(&self, page: PageRequest) -> AppResult<Vec<Account>> {
        let models = AccountEntity::find()
            .order_by_asc(account::Column::JoinDate)
            .order_by_asc(account::Column::UserId)
            .limit(page.limit())
            .offset(page.offset)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Account::from).collect())
    }

    async fn count(&self) -> AppResult<u64> {
        AccountEntity::find()
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn count_active_since(&self, since: DateTime<Utc>) -> AppResult<u64> {
        AccountEntity::find()
            .filter(account::Column::LastClaim.gt(since))
            .count(&self.db)
            .await
            .map_err(AppError::from)
    }

    async fn sum_total_earned(&self) -> AppResult<Decimal> {
        let total: Option<Option<Decimal>> = AccountEntity::find()
            .select_only()
            .column_as(account::Column::TotalEarned.sum(), "total")
            .into_tuple()
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(total.flatten().unwrap_or_default())
    }

    async fn top_by_total_earned(&self, limit: u64) -> AppResult<Vec<LeaderboardEntry>> {
        let models = AccountEntity::find()
            .order_by_desc(account::Column::TotalEarned)
            .order_by_asc(account::Column::UserId)
            .limit(limit)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models
            .into_iter()
            .map(Account::from)
            .map(|account| LeaderboardEntry {
                user_id: account.user_id,
                username: account.username,
                total_earned: account.total_earned,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use domain::Amount;
    use sea_orm::{DatabaseBackend, MockDatabase, Transaction};

    /// Render a logged statement with plain quotes
    fn logged_sql(txn: &Transaction) -> String {
        format!("{:?}", txn).replace("\\\"", "\"")
    }

    fn model(user_id: &str, balance: &str) -> account::Model {
        account::Model {
            user_id: user_id.to_string(),
            username: None,
            balance: balance.parse().unwrap(),
            total_earned: balance.parse().unwrap(),
            referrals: 0,
            last_claim: None,
            last_daily: None,
            wallet: None,
            referred_by: None,
            join_date: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_maps_model() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model("u1", "0")]])
            .into_connection();
        let store = AccountStore::new(db);

        let account = store.find_by_id("u1").await.unwrap().unwrap();

        assert_eq!(account.user_id, "u1");
        assert_eq!(account.balance.to_string(), "0.00000000");
        assert_eq!(account.total_earned.to_string(), "0.00000000");
        assert_eq!(account.referrals, 0);
        assert_eq!(account.wallet, None);
    }

    #[tokio::test]
    async fn test_find_by_id_missing() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<account::Model>::new()])
            .into_connection();
        let store = AccountStore::new(db);

        let result = store.find_by_id("nobody").await.unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_create_returns_inserted_row() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model("u1", "0")]])
            .into_connection();
        let store = AccountStore::new(db);

        let account = Account::new("u1", Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap());
        let created = store.create(account.clone()).await.unwrap();

        assert_eq!(created, account);
    }

    #[tokio::test]
    async fn test_update_preserves_exact_balance() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model("u1", "123.45000000")]])
            .into_connection();
        let store = AccountStore::new(db);

        let balance: Amount = "123.45".parse().unwrap();
        let changes = AccountChanges::default().with_balance(balance);
        let updated = store.update("u1", changes).await.unwrap();

        assert_eq!(updated.balance.to_string(), "123.45000000");
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<account::Model>::new()])
            .into_connection();
        let store = AccountStore::new(db);

        let changes = AccountChanges::default().with_referrals(1);
        let result = store.update("nobody", changes).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_increment_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<account::Model>::new()])
            .into_connection();
        let store = AccountStore::new(db);

        let delta = AccountIncrement::default().with_referrals(1);
        let result = store.increment("nobody", delta).await;

        assert!(matches!(result, Err(AppError::NotFound)));
    }

    #[tokio::test]
    async fn test_increment_issues_single_statement() {
        let mut row = model("u1", "3");
        row.referrals = 1;
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![row]])
            .into_connection();
        let store = AccountStore::new(db);

        let delta = AccountIncrement::default()
            .with_balance("3".parse().unwrap())
            .with_total_earned("3".parse().unwrap())
            .with_referrals(1);
        let account = store.increment("u1", delta).await.unwrap();

        assert_eq!(account.referrals, 1);
        assert_eq!(account.balance.to_string(), "3.00000000");

        let log = store.into_inner().into_transaction_log();
        assert_eq!(log.len(), 1);
        let sql = logged_sql(&log[0]);
        assert!(sql.contains("UPDATE"));
        assert!(sql.contains("\"referrals\" + "));
    }

    #[tokio::test]
    async fn test_save_keeps_join_date_out_of_conflict_update() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model("u1", "5")]])
            .into_connection();
        let store = AccountStore::new(db);

        let mut account = Account::new("u1", Utc::now());
        account.balance = "5".parse().unwrap();
        store.save(account).await.unwrap();

        let log = store.into_inner().into_transaction_log();
        let sql = logged_sql(&log[0]);
        assert!(sql.contains("ON CONFLICT"));
        assert!(!sql.contains("\"join_date\" = \"excluded\".\"join_date\""));
    }

    #[tokio::test]
    async fn test_top_by_total_earned_maps_entries() {
        let mut first = model("u2", "50");
        first.username = Some("bob".to_string());
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![first, model("u1", "10")]])
            .into_connection();
        let store = AccountStore::new(db);

        let entries = store.top_by_total_earned(10).await.unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].display_name(), "bob");
        assert_eq!(entries[0].total_earned.to_string(), "50.00000000");
        assert_eq!(entries[1].display_name(), "Anonymous");
    }
}
