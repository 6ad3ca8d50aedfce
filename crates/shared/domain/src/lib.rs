//! Domain layer - account entity and value objects.
//!
//! This crate contains pure domain logic with no infrastructure dependencies.

pub mod account;
pub mod amount;
pub mod constants;
pub mod error;
pub mod pagination;
pub mod stats;

pub use account::{validate_user_id, Account, AccountChanges, AccountIncrement, NewAccount};
pub use amount::Amount;
pub use constants::*;
pub use error::{DomainError, DomainResult};
pub use pagination::PageRequest;
pub use stats::{activity_cutoff, AccountStats, LeaderboardEntry};
