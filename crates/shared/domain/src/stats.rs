//! Aggregate read models over the account table.

use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::amount::Amount;
use crate::constants::DEFAULT_ACTIVITY_WINDOW_HOURS;

/// One row of the earnings leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: String,
    pub username: Option<String>,
    pub total_earned: Amount,
}

impl LeaderboardEntry {
    /// Name to show for the entry, falling back to "Anonymous"
    pub fn display_name(&self) -> &str {
        self.username.as_deref().unwrap_or("Anonymous")
    }
}

/// Store-wide totals
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountStats {
    pub total_accounts: u64,
    /// Accounts whose last claim falls inside the activity window
    pub active_accounts: u64,
    /// Sum of lifetime earnings; may exceed the per-row 20/8 bound
    pub total_earned: Decimal,
}

/// Lower bound of the activity window ending at `now`
pub fn activity_cutoff(now: DateTime<Utc>, window_hours: Option<i64>) -> DateTime<Utc> {
    now - Duration::hours(window_hours.unwrap_or(DEFAULT_ACTIVITY_WINDOW_HOURS))
}
