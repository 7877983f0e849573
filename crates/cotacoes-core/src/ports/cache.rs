//! Cache trait for the read-through layer

use async_trait::async_trait;

/// Read-through cache keyed by logical resource path.
///
/// Every operation is best-effort: a backend failure degrades to a
/// cache miss (or a no-op for writes) and must never block request
/// handling.
#[async_trait]
pub trait QuoteCache: Send + Sync {
    /// Cached value if present and unexpired, `None` otherwise -
    /// including on any backend failure.
    async fn get(&self, key: &str) -> Option<String>;

    async fn set(&self, key: &str, value: &str, ttl_secs: u64);

    async fn invalidate(&self, keys: &[&str]);

    /// Liveness probe, reported by the health endpoint separately from
    /// persistence status.
    async fn ping(&self) -> bool;
}
