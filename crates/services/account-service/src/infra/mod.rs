//! Infrastructure layer - database and cache.

pub mod cache;
mod db;
pub mod migrations;

pub use cache::{AccountCache, RedisAccountCache};
pub use db::Database;
pub use migrations::Migrator;
