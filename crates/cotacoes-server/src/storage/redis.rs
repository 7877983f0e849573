//! Redis cache adapter
//!
//! Every operation is best-effort: backend failures are logged at warn
//! level and degrade to a cache miss, so a cache outage never blocks
//! request handling.

use async_trait::async_trait;
use cotacoes_core::ports::QuoteCache;
use cotacoes_core::{CotacaoError, Result};
use redis::aio::ConnectionManager;
use std::time::Duration;
use tracing::warn;

/// Default network timeout for cache calls, so an unresponsive backend
/// cannot suspend a request indefinitely.
const CALL_TIMEOUT: Duration = Duration::from_secs(2);

pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    pub async fn connect(redis_url: &str) -> Result<Self> {
        tracing::info!("Connecting to Redis cache...");

        let client = redis::Client::open(redis_url)
            .map_err(|e| CotacaoError::Cache(e.to_string()))?;
        let conn = ConnectionManager::new(client)
            .await
            .map_err(|e| CotacaoError::Cache(e.to_string()))?;

        tracing::info!("Redis cache connected");

        Ok(Self { conn })
    }

    async fn run<T: redis::FromRedisValue>(&self, cmd: &redis::Cmd) -> Result<T> {
        let mut conn = self.conn.clone();
        let reply = tokio::time::timeout(CALL_TIMEOUT, cmd.query_async(&mut conn))
            .await
            .map_err(|_| CotacaoError::Cache("cache call timed out".to_string()))?;

        reply.map_err(|e| CotacaoError::Cache(e.to_string()))
    }
}

#[async_trait]
impl QuoteCache for RedisCache {
    async fn get(&self, key: &str) -> Option<String> {
        match self.run::<Option<String>>(redis::cmd("GET").arg(key)).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Cache get failed for {}: {}", key, e);
                None
            }
        }
    }

    async fn set(&self, key: &str, value: &str, ttl_secs: u64) {
        let result = self
            .run::<()>(redis::cmd("SETEX").arg(key).arg(ttl_secs).arg(value))
            .await;
        if let Err(e) = result {
            warn!("Cache set failed for {}: {}", key, e);
        }
    }

    async fn invalidate(&self, keys: &[&str]) {
        if keys.is_empty() {
            return;
        }
        let mut cmd = redis::cmd("DEL");
        for key in keys {
            cmd.arg(*key);
        }
        if let Err(e) = self.run::<i64>(&cmd).await {
            warn!("Cache invalidation failed for {:?}: {}", keys, e);
        }
    }

    async fn ping(&self) -> bool {
        match self.run::<String>(&redis::cmd("PING")).await {
            Ok(_) => true,
            Err(e) => {
                warn!("Cache ping failed: {}", e);
                false
            }
        }
    }
}
