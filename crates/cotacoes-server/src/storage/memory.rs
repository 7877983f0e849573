//! In-memory adapters using DashMap
//!
//! `MemoryStore` and `MemoryCache` implement the same ports as the
//! Postgres/Redis adapters and back the router-level and cache-policy
//! tests.

use async_trait::async_trait;
use cotacoes_core::ports::{QuoteCache, RecordStore};
use cotacoes_core::{AtualizaCotacao, Cotacao, Result};
use dashmap::DashMap;
use std::time::{Duration, Instant};

/// DashMap-backed record store.
#[derive(Default)]
pub struct MemoryStore {
    records: DashMap<String, Cotacao>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn list(&self) -> Result<Vec<Cotacao>> {
        let mut all: Vec<Cotacao> = self.records.iter().map(|e| e.value().clone()).collect();
        // id breaks creation-time ties so listing order is deterministic
        all.sort_by(|a, b| b.timestamp.cmp(&a.timestamp).then_with(|| b.id.cmp(&a.id)));
        Ok(all)
    }

    async fn get(&self, id: &str) -> Result<Option<Cotacao>> {
        Ok(self.records.get(id).map(|e| e.value().clone()))
    }

    async fn insert(&self, cotacao: &Cotacao) -> Result<()> {
        self.records.insert(cotacao.id.clone(), cotacao.clone());
        Ok(())
    }

    async fn update(&self, id: &str, patch: AtualizaCotacao) -> Result<Option<Cotacao>> {
        match self.records.get_mut(id) {
            Some(mut entry) => {
                entry.apply(patch);
                Ok(Some(entry.clone()))
            }
            None => Ok(None),
        }
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.records.remove(id).is_some())
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

struct CacheEntry {
    value: String,
    expires_at: Instant,
}

/// Simple in-memory cache with TTL support.
#[derive(Default)]
pub struct MemoryCache {
    data: DashMap<String, CacheEntry>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl QuoteCache for MemoryCache {
    async fn get(&self, key: &str) -> Option<String> {
        let entry = self.data.get(key)?;
        if Instant::now() > entry.expires_at {
            drop(entry);
            self.data.remove(key);
            return None;
        }
        Some(entry.value.clone())
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) {
        self.data.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_string(),
                expires_at: Instant::now() + Duration::from_secs(ttl_secs),
            },
        );
    }

    async fn invalidate(&self, keys: &[&str]) {
        for key in keys {
            self.data.remove(*key);
        }
    }

    async fn ping(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cotacoes_core::NovaCotacao;

    fn nova(responsavel: &str) -> NovaCotacao {
        serde_json::from_value(serde_json::json!({
            "responsavelCotacao": responsavel,
            "transportadora": "Transportes X",
            "valorFrete": 100.0
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn store_lists_newest_first() {
        let store = MemoryStore::new();

        let mut first = Cotacao::new(nova("A"));
        let mut second = Cotacao::new(nova("B"));
        first.timestamp = "2024-01-01T00:00:00Z".parse().unwrap();
        second.timestamp = "2024-06-01T00:00:00Z".parse().unwrap();
        store.insert(&first).await.unwrap();
        store.insert(&second).await.unwrap();

        let all = store.list().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].id, second.id);
        assert_eq!(all[1].id, first.id);
    }

    #[tokio::test]
    async fn store_breaks_creation_time_ties_by_id() {
        let store = MemoryStore::new();
        let shared: chrono::DateTime<chrono::Utc> = "2024-01-01T00:00:00Z".parse().unwrap();

        let mut a = Cotacao::new(nova("A"));
        let mut b = Cotacao::new(nova("B"));
        a.timestamp = shared;
        b.timestamp = shared;
        store.insert(&a).await.unwrap();
        store.insert(&b).await.unwrap();

        let mut expected = vec![a.id.clone(), b.id.clone()];
        expected.sort();
        expected.reverse();

        let all = store.list().await.unwrap();
        let listed: Vec<String> = all.into_iter().map(|c| c.id).collect();
        assert_eq!(listed, expected);
    }

    #[tokio::test]
    async fn store_update_and_delete() {
        let store = MemoryStore::new();
        let cotacao = Cotacao::new(nova("A"));
        store.insert(&cotacao).await.unwrap();

        let updated = store
            .update(
                &cotacao.id,
                AtualizaCotacao {
                    valor_frete: Some(42.0),
                    ..Default::default()
                },
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.valor_frete, 42.0);
        assert_eq!(updated.id, cotacao.id);
        assert!(updated.updated_at.is_some());

        assert!(!store.delete("missing").await.unwrap());
        assert!(store.delete(&cotacao.id).await.unwrap());
        assert!(store.get(&cotacao.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn cache_basic_operations() {
        let cache = MemoryCache::new();

        cache.set("key1", "value1", 60).await;
        assert_eq!(cache.get("key1").await.as_deref(), Some("value1"));
        assert_eq!(cache.get("nonexistent").await, None);

        cache.invalidate(&["key1"]).await;
        assert_eq!(cache.get("key1").await, None);
    }

    #[tokio::test]
    async fn cache_entry_is_never_trusted_past_expiry() {
        let cache = MemoryCache::new();

        cache.set("key1", "value1", 0).await;
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(cache.get("key1").await, None);
    }
}
