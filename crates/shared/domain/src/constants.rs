//! Domain-level constants.
//!
//! These constants mirror the column bounds of the `users` table.

// =============================================================================
// Column bounds
// =============================================================================

/// Maximum length of an account identifier (`user_id`, `referred_by`)
pub const USER_ID_MAX_LENGTH: u64 = 32;

/// Maximum length of a display name
pub const USERNAME_MAX_LENGTH: u64 = 64;

/// Maximum length of a payout wallet address
pub const WALLET_MAX_LENGTH: u64 = 42;

// =============================================================================
// Amounts
// =============================================================================

/// Total number of decimal digits an amount may carry
pub const AMOUNT_PRECISION: u32 = 20;

/// Number of fractional digits every amount is stored with
pub const AMOUNT_SCALE: u32 = 8;

/// Number of integer digits left once the fractional digits are reserved
pub const AMOUNT_INTEGER_DIGITS: u32 = AMOUNT_PRECISION - AMOUNT_SCALE;

// =============================================================================
// Queries
// =============================================================================

/// Default number of rows returned by a batch listing
pub const DEFAULT_PAGE_SIZE: u64 = 1000;

/// Maximum number of rows a single batch listing may return
pub const MAX_PAGE_SIZE: u64 = 1000;

/// Default size of the earnings leaderboard
pub const DEFAULT_LEADERBOARD_SIZE: u64 = 10;

/// Default window (hours) in which a claim counts as recent activity
pub const DEFAULT_ACTIVITY_WINDOW_HOURS: i64 = 24;
