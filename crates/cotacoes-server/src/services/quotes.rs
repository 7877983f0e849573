//! Quote service: read-through cache over the record store
//!
//! Reads consult the cache first and fill it on a miss; writes hit the
//! store first and invalidate the affected cache entries only after the
//! store succeeds. A failed invalidation never fails the write - stale
//! entries self-heal at TTL expiry.

use cotacoes_core::ports::{QuoteCache, RecordStore};
use cotacoes_core::{AtualizaCotacao, Cotacao, CotacaoError, NovaCotacao, Result};
use std::sync::Arc;
use tracing::debug;

/// Default cache entry lifetime, in seconds.
pub const CACHE_TTL_SECS: u64 = 300;

const KEY_ALL: &str = "cotacoes:all";

fn item_key(id: &str) -> String {
    format!("cotacoes:{}", id)
}

pub struct QuoteService {
    store: Arc<dyn RecordStore>,
    cache: Option<Arc<dyn QuoteCache>>,
}

impl QuoteService {
    pub fn new(store: Arc<dyn RecordStore>, cache: Option<Arc<dyn QuoteCache>>) -> Self {
        Self { store, cache }
    }

    pub fn cache_enabled(&self) -> bool {
        self.cache.is_some()
    }

    /// Cache liveness, `None` when the cache is disabled.
    pub async fn cache_ping(&self) -> Option<bool> {
        match &self.cache {
            Some(cache) => Some(cache.ping().await),
            None => None,
        }
    }

    pub async fn list(&self) -> Result<Vec<Cotacao>> {
        if let Some(cache) = &self.cache {
            if let Some(raw) = cache.get(KEY_ALL).await {
                if let Ok(all) = serde_json::from_str::<Vec<Cotacao>>(&raw) {
                    debug!("Cache hit: {}", KEY_ALL);
                    return Ok(all);
                }
            }
        }

        let all = self.store.list().await?;
        if let Some(cache) = &self.cache {
            cache
                .set(KEY_ALL, &serde_json::to_string(&all)?, CACHE_TTL_SECS)
                .await;
        }
        Ok(all)
    }

    pub async fn get(&self, id: &str) -> Result<Cotacao> {
        let key = item_key(id);
        if let Some(cache) = &self.cache {
            if let Some(raw) = cache.get(&key).await {
                if let Ok(cotacao) = serde_json::from_str::<Cotacao>(&raw) {
                    debug!("Cache hit: {}", key);
                    return Ok(cotacao);
                }
            }
        }

        let cotacao = self
            .store
            .get(id)
            .await?
            .ok_or_else(|| not_found(id))?;
        if let Some(cache) = &self.cache {
            cache
                .set(&key, &serde_json::to_string(&cotacao)?, CACHE_TTL_SECS)
                .await;
        }
        Ok(cotacao)
    }

    pub async fn create(&self, nova: NovaCotacao) -> Result<Cotacao> {
        let cotacao = Cotacao::new(nova);
        self.store.insert(&cotacao).await?;
        self.invalidate(&cotacao.id).await;
        Ok(cotacao)
    }

    pub async fn update(&self, id: &str, patch: AtualizaCotacao) -> Result<Cotacao> {
        let updated = self
            .store
            .update(id, patch)
            .await?
            .ok_or_else(|| not_found(id))?;
        self.invalidate(id).await;
        Ok(updated)
    }

    pub async fn delete(&self, id: &str) -> Result<()> {
        if !self.store.delete(id).await? {
            return Err(not_found(id));
        }
        self.invalidate(id).await;
        Ok(())
    }

    /// Invalidate the full-collection view plus the per-record entry.
    /// Runs only after the store operation has succeeded.
    async fn invalidate(&self, id: &str) {
        if let Some(cache) = &self.cache {
            let key = item_key(id);
            cache.invalidate(&[KEY_ALL, &key]).await;
        }
    }
}

fn not_found(id: &str) -> CotacaoError {
    CotacaoError::NotFound(format!("quote not found: {}", id))
}
