//! Repository layer for data access.

mod account_repository;
mod cached;
pub mod entities;

pub use account_repository::{AccountRepository, AccountStore};
pub use cached::CachedAccountRepository;

#[cfg(any(test, feature = "test-utils"))]
pub use account_repository::MockAccountRepository;
