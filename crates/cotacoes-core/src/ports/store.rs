//! Record store trait for quote persistence

use crate::types::quote::{AtualizaCotacao, Cotacao};
use crate::Result;
use async_trait::async_trait;

/// Quote persistence. One backend is selected at configuration time;
/// the service never manipulates storage internals directly.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// All records, newest first (by creation timestamp).
    async fn list(&self) -> Result<Vec<Cotacao>>;

    async fn get(&self, id: &str) -> Result<Option<Cotacao>>;

    async fn insert(&self, cotacao: &Cotacao) -> Result<()>;

    /// Partial field replacement. Returns the updated record, or `None`
    /// when the identifier is unknown.
    async fn update(&self, id: &str, patch: AtualizaCotacao) -> Result<Option<Cotacao>>;

    /// Returns `false` when the identifier is unknown.
    async fn delete(&self, id: &str) -> Result<bool>;

    /// Liveness probe against the backend.
    async fn ping(&self) -> Result<()>;
}
