//! Session and bootstrap-token types

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Server-tracked authenticated state, established by redeeming a
/// bootstrap token. Expires after a fixed absolute lifetime measured
/// from creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
    pub id: String,
    pub authenticated: bool,
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            authenticated: true,
            logged_in_at: Utc::now(),
        }
    }

    pub fn is_expired(&self, lifetime: Duration) -> bool {
        Utc::now() - self.logged_in_at >= lifetime
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

/// A one-time credential valid for a short window. `used` flips on
/// redemption and never resets.
#[derive(Debug, Clone)]
pub struct BootstrapToken {
    pub issued_at: DateTime<Utc>,
    pub used: bool,
}

impl BootstrapToken {
    pub fn new() -> Self {
        Self {
            issued_at: Utc::now(),
            used: false,
        }
    }

    pub fn is_expired(&self, window: Duration) -> bool {
        Utc::now() - self.issued_at > window
    }
}

impl Default for BootstrapToken {
    fn default() -> Self {
        Self::new()
    }
}
