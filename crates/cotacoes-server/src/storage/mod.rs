//! Storage adapters
//!
//! Postgres for persistence, Redis for the optional cache. The
//! in-memory adapters implement the same ports and back the test
//! suites.

#[cfg(test)]
pub mod memory;
pub mod postgres;
pub mod redis;

#[cfg(test)]
pub use memory::{MemoryCache, MemoryStore};
pub use postgres::PostgresStore;
pub use redis::RedisCache;
