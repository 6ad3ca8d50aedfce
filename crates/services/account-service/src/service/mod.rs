//! Service layer.

mod account_service;

pub use account_service::{AccountManager, AccountService};
