//! Bootstrap-token registry
//!
//! One-time tokens issued on demand, redeemable exactly once within a
//! short window to establish a session. Expired entries are purged by a
//! periodic sweep that never blocks request handling.

use chrono::Duration;
use cotacoes_core::BootstrapToken;
use dashmap::DashMap;
use rand::distributions::Alphanumeric;
use rand::Rng;
use std::sync::Arc;
use tracing::debug;

/// Validity window of an issued token, in seconds.
pub const TOKEN_WINDOW_SECS: i64 = 30;

/// How often expired tokens are purged, in seconds.
pub const SWEEP_INTERVAL_SECS: u64 = 60;

/// Outcome of a redemption attempt. Used and unknown tokens are
/// indistinguishable to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redemption {
    Granted,
    Expired,
    Unknown,
}

pub struct BootstrapRegistry {
    tokens: DashMap<String, BootstrapToken>,
    window: Duration,
}

impl BootstrapRegistry {
    pub fn new() -> Self {
        Self {
            tokens: DashMap::new(),
            window: Duration::seconds(TOKEN_WINDOW_SECS),
        }
    }

    #[cfg(test)]
    pub(crate) fn with_window(window: Duration) -> Self {
        Self {
            tokens: DashMap::new(),
            window,
        }
    }

    /// Generate a fresh single-use token.
    pub fn issue(&self) -> String {
        let token: String = rand::thread_rng()
            .sample_iter(&Alphanumeric)
            .take(32)
            .map(char::from)
            .collect();
        self.tokens.insert(token.clone(), BootstrapToken::new());
        debug!("Issued bootstrap token");
        token
    }

    /// Atomic check-and-mark-used: the entry guard serializes access per
    /// key, so two requests racing the same token cannot both redeem it.
    pub fn redeem(&self, token: &str) -> Redemption {
        match self.tokens.get_mut(token) {
            Some(mut entry) => {
                if entry.used {
                    Redemption::Unknown
                } else if entry.is_expired(self.window) {
                    Redemption::Expired
                } else {
                    entry.used = true;
                    Redemption::Granted
                }
            }
            None => Redemption::Unknown,
        }
    }

    /// Drop every token past its window, used or not.
    pub fn sweep(&self) {
        let before = self.tokens.len();
        let window = self.window;
        self.tokens.retain(|_, token| !token.is_expired(window));
        let purged = before - self.tokens.len();
        if purged > 0 {
            debug!("Swept {} expired bootstrap token(s)", purged);
        }
    }

    pub fn start_sweep_task(self: Arc<Self>) {
        let registry = self;
        tokio::spawn(async move {
            let mut interval =
                tokio::time::interval(std::time::Duration::from_secs(SWEEP_INTERVAL_SECS));
            loop {
                interval.tick().await;
                registry.sweep();
            }
        });
    }

    #[cfg(test)]
    fn pending(&self) -> usize {
        self.tokens.len()
    }
}

impl Default for BootstrapRegistry {
    fn default() -> Self {
        Self::new()
    }
}
