//! Error types for the freight-quote service

use thiserror::Error;

pub type Result<T> = std::result::Result<T, CotacaoError>;

#[derive(Error, Debug)]
pub enum CotacaoError {
    /// Fatal, startup only - a mandatory secret/credential is missing.
    #[error("Config error: {0}")]
    Config(String),

    /// Missing or expired credential (401).
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Malformed or invalid signed token (403).
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Unknown record identifier (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Persistence backend failure (500). Logged, never crashes the process.
    #[error("Database error: {0}")]
    Database(String),

    /// Cache backend failure. Degrades to cache-miss behaviour, warn only.
    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<serde_json::Error> for CotacaoError {
    fn from(e: serde_json::Error) -> Self {
        CotacaoError::Serialization(e.to_string())
    }
}
