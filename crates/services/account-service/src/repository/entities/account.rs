//! Account database entity for SeaORM.

use sea_orm::entity::prelude::*;
use sea_orm::Set;

use domain::{Account, Amount};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false, column_type = "String(StringLen::N(32))")]
    pub user_id: String,
    #[sea_orm(column_type = "String(StringLen::N(64))", nullable)]
    pub username: Option<String>,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub balance: Decimal,
    #[sea_orm(column_type = "Decimal(Some((20, 8)))")]
    pub total_earned: Decimal,
    pub referrals: i32,
    pub last_claim: Option<DateTimeUtc>,
    pub last_daily: Option<DateTimeUtc>,
    #[sea_orm(column_type = "String(StringLen::N(42))", nullable)]
    pub wallet: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(32))", nullable)]
    pub referred_by: Option<String>,
    pub join_date: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for Account {
    fn from(model: Model) -> Self {
        Account {
            user_id: model.user_id,
            username: model.username,
            balance: Amount::from_column(model.balance),
            total_earned: Amount::from_column(model.total_earned),
            referrals: model.referrals,
            last_claim: model.last_claim,
            last_daily: model.last_daily,
            wallet: model.wallet,
            referred_by: model.referred_by,
            join_date: model.join_date,
        }
    }
}

/// Convert domain entity to a fully-set active model (inserts and upserts)
impl From<Account> for ActiveModel {
    fn from(account: Account) -> Self {
        ActiveModel {
            user_id: Set(account.user_id),
            username: Set(account.username),
            balance: Set(account.balance.into_inner()),
            total_earned: Set(account.total_earned.into_inner()),
            referrals: Set(account.referrals),
            last_claim: Set(account.last_claim),
            last_daily: Set(account.last_daily),
            wallet: Set(account.wallet),
            referred_by: Set(account.referred_by),
            join_date: Set(account.join_date),
        }
    }
}
