//! Account domain entity and related types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::amount::Amount;
use crate::constants::{USERNAME_MAX_LENGTH, USER_ID_MAX_LENGTH, WALLET_MAX_LENGTH};
use crate::error::{DomainError, DomainResult};

/// Account domain entity (one row of the `users` table)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub user_id: String,
    pub username: Option<String>,
    pub balance: Amount,
    pub total_earned: Amount,
    pub referrals: i32,
    pub last_claim: Option<DateTime<Utc>>,
    pub last_daily: Option<DateTime<Utc>>,
    pub wallet: Option<String>,
    /// Identifier of the referring account; not checked against existing rows
    pub referred_by: Option<String>,
    pub join_date: DateTime<Utc>,
}

impl Account {
    /// Create an account carrying only the declared defaults
    pub fn new(user_id: impl Into<String>, join_date: DateTime<Utc>) -> Self {
        Self {
            user_id: user_id.into(),
            username: None,
            balance: Amount::zero(),
            total_earned: Amount::zero(),
            referrals: 0,
            last_claim: None,
            last_daily: None,
            wallet: None,
            referred_by: None,
            join_date,
        }
    }

    /// Build an account from creation input, filling omitted fields with defaults
    pub fn from_new(new: NewAccount, join_date: DateTime<Utc>) -> Self {
        Self {
            user_id: new.user_id,
            username: new.username,
            balance: new.balance.unwrap_or_default(),
            total_earned: new.total_earned.unwrap_or_default(),
            referrals: new.referrals.unwrap_or(0),
            last_claim: new.last_claim,
            last_daily: new.last_daily,
            wallet: new.wallet,
            referred_by: new.referred_by,
            join_date,
        }
    }

    /// Apply a change set in place. `user_id` and `join_date` never change.
    pub fn apply(&mut self, changes: AccountChanges) {
        if let Some(username) = changes.username {
            self.username = username;
        }
        if let Some(balance) = changes.balance {
            self.balance = balance;
        }
        if let Some(total_earned) = changes.total_earned {
            self.total_earned = total_earned;
        }
        if let Some(referrals) = changes.referrals {
            self.referrals = referrals;
        }
        if let Some(last_claim) = changes.last_claim {
            self.last_claim = last_claim;
        }
        if let Some(last_daily) = changes.last_daily {
            self.last_daily = last_daily;
        }
        if let Some(wallet) = changes.wallet {
            self.wallet = wallet;
        }
        if let Some(referred_by) = changes.referred_by {
            self.referred_by = referred_by;
        }
    }

    /// Check if a payout wallet is on file
    pub fn has_wallet(&self) -> bool {
        self.wallet.is_some()
    }

    /// Check if the account was referred by another account
    pub fn was_referred(&self) -> bool {
        self.referred_by.is_some()
    }

    /// Validate every bounded column of the account
    pub fn validate_fields(&self) -> DomainResult<()> {
        validate_user_id("user_id", &self.user_id)?;
        check_optional_length("username", self.username.as_deref(), USERNAME_MAX_LENGTH)?;
        check_optional_length("wallet", self.wallet.as_deref(), WALLET_MAX_LENGTH)?;
        if let Some(referred_by) = &self.referred_by {
            validate_user_id("referred_by", referred_by)?;
        }
        Ok(())
    }
}

/// Account creation data transfer object
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewAccount {
    /// Unique account identifier
    #[validate(length(min = 1, max = 32))]
    pub user_id: String,
    /// Display name (at most 64 characters)
    #[validate(length(max = 64))]
    pub username: Option<String>,
    #[serde(default)]
    pub balance: Option<Amount>,
    #[serde(default)]
    pub total_earned: Option<Amount>,
    #[serde(default)]
    pub referrals: Option<i32>,
    #[serde(default)]
    pub last_claim: Option<DateTime<Utc>>,
    #[serde(default)]
    pub last_daily: Option<DateTime<Utc>>,
    /// Payout address (at most 42 characters)
    #[validate(length(max = 42))]
    pub wallet: Option<String>,
    #[validate(length(min = 1, max = 32))]
    pub referred_by: Option<String>,
}

impl NewAccount {
    /// Start creation input for the given identifier
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }

    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    pub fn with_balance(mut self, balance: Amount) -> Self {
        self.balance = Some(balance);
        self
    }

    pub fn with_total_earned(mut self, total_earned: Amount) -> Self {
        self.total_earned = Some(total_earned);
        self
    }

    pub fn with_wallet(mut self, wallet: impl Into<String>) -> Self {
        self.wallet = Some(wallet.into());
        self
    }

    pub fn with_referred_by(mut self, referred_by: impl Into<String>) -> Self {
        self.referred_by = Some(referred_by.into());
        self
    }

    /// Run the derived length rules
    pub fn check(&self) -> DomainResult<()> {
        self.validate().map_err(DomainError::from)
    }
}

/// Partial update of the mutable account fields.
///
/// `None` leaves a field untouched. For nullable columns `Some(None)`
/// clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountChanges {
    pub username: Option<Option<String>>,
    pub balance: Option<Amount>,
    pub total_earned: Option<Amount>,
    pub referrals: Option<i32>,
    pub last_claim: Option<Option<DateTime<Utc>>>,
    pub last_daily: Option<Option<DateTime<Utc>>>,
    pub wallet: Option<Option<String>>,
    pub referred_by: Option<Option<String>>,
}

impl AccountChanges {
    pub fn with_username(mut self, username: Option<String>) -> Self {
        self.username = Some(username);
        self
    }

    pub fn with_balance(mut self, balance: Amount) -> Self {
        self.balance = Some(balance);
        self
    }

    pub fn with_total_earned(mut self, total_earned: Amount) -> Self {
        self.total_earned = Some(total_earned);
        self
    }

    pub fn with_referrals(mut self, referrals: i32) -> Self {
        self.referrals = Some(referrals);
        self
    }

    pub fn with_last_claim(mut self, last_claim: Option<DateTime<Utc>>) -> Self {
        self.last_claim = Some(last_claim);
        self
    }

    pub fn with_last_daily(mut self, last_daily: Option<DateTime<Utc>>) -> Self {
        self.last_daily = Some(last_daily);
        self
    }

    pub fn with_wallet(mut self, wallet: Option<String>) -> Self {
        self.wallet = Some(wallet);
        self
    }

    pub fn with_referred_by(mut self, referred_by: Option<String>) -> Self {
        self.referred_by = Some(referred_by);
        self
    }

    /// Check if no field is touched
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Validate the bounded text columns that are being set
    pub fn check(&self) -> DomainResult<()> {
        if let Some(username) = &self.username {
            check_optional_length("username", username.as_deref(), USERNAME_MAX_LENGTH)?;
        }
        if let Some(wallet) = &self.wallet {
            check_optional_length("wallet", wallet.as_deref(), WALLET_MAX_LENGTH)?;
        }
        if let Some(Some(referred_by)) = &self.referred_by {
            validate_user_id("referred_by", referred_by)?;
        }
        Ok(())
    }
}

/// Atomic counter deltas applied as `column = column + delta`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccountIncrement {
    pub balance: Amount,
    pub total_earned: Amount,
    pub referrals: i32,
}

impl AccountIncrement {
    pub fn with_balance(mut self, delta: Amount) -> Self {
        self.balance = delta;
        self
    }

    pub fn with_total_earned(mut self, delta: Amount) -> Self {
        self.total_earned = delta;
        self
    }

    pub fn with_referrals(mut self, delta: i32) -> Self {
        self.referrals = delta;
        self
    }

    /// Check if every delta is zero
    pub fn is_empty(&self) -> bool {
        self.balance.is_zero() && self.total_earned.is_zero() && self.referrals == 0
    }
}

/// Validate an account identifier (non-empty, at most 32 characters)
pub fn validate_user_id(field: &str, value: &str) -> DomainResult<()> {
    if value.is_empty() {
        return Err(DomainError::validation(format!("{} must not be empty", field)));
    }
    check_length(field, value, USER_ID_MAX_LENGTH)
}

fn check_optional_length(field: &str, value: Option<&str>, max: u64) -> DomainResult<()> {
    match value {
        Some(value) => check_length(field, value, max),
        None => Ok(()),
    }
}

fn check_length(field: &str, value: &str, max: u64) -> DomainResult<()> {
    if value.chars().count() as u64 > max {
        return Err(DomainError::validation(format!(
            "{} must be at most {} characters",
            field, max
        )));
    }
    Ok(())
}
