//! Session registry
//!
//! Sessions are created when a bootstrap token is redeemed and expire
//! after a fixed absolute lifetime measured from creation.

use chrono::Duration;
use cotacoes_core::Session;
use dashmap::DashMap;
use std::sync::Arc;
use tracing::info;

/// Absolute session lifetime, in hours.
pub const SESSION_LIFETIME_HOURS: i64 = 8;

pub struct SessionRegistry {
    sessions: DashMap<String, Session>,
    lifetime: Duration,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
            lifetime: Duration::hours(SESSION_LIFETIME_HOURS),
        }
    }

    #[cfg(test)]
    fn with_lifetime(lifetime: Duration) -> Self {
        Self {
            sessions: DashMap::new(),
            lifetime,
        }
    }

    pub fn create(&self) -> Session {
        let session = Session::new();
        info!("Session established: {}", session.id);
        self.sessions.insert(session.id.clone(), session.clone());
        session
    }

    /// Expired sessions are dropped on access rather than waiting for
    /// the sweep.
    pub fn is_authenticated(&self, id: &str) -> bool {
        match self.sessions.get(id) {
            Some(session) => {
                if session.is_expired(self.lifetime) {
                    drop(session);
                    self.sessions.remove(id);
                    false
                } else {
                    session.authenticated
                }
            }
            None => false,
        }
    }

    pub fn sweep(&self) {
        let lifetime = self.lifetime;
        self.sessions.retain(|_, session| !session.is_expired(lifetime));
    }

    pub fn start_sweep_task(self: Arc<Self>) {
        let registry = self;
        tokio::spawn(async move {
            let mut interval = tokio::time::interval(std::time::Duration::from_secs(
                super::bootstrap::SWEEP_INTERVAL_SECS,
            ));
            loop {
                interval.tick().await;
                registry.sweep();
            }
        });
    }
}

impl Default for SessionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
