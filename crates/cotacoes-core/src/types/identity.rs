//! Caller identity attached by the authentication gate

use serde::{Deserialize, Serialize};

/// Identity of an authenticated caller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub display_name: String,
    pub admin: bool,
}

impl Identity {
    /// Synthetic identity attached on a static fallback-token match,
    /// used for simple machine-to-machine calls.
    pub fn machine() -> Self {
        Self {
            username: "service".to_string(),
            display_name: "Service Token".to_string(),
            admin: true,
        }
    }
}
