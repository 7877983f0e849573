//! Cotacoes Core Library
//!
//! Domain types, error taxonomy, and port traits for the freight-quote
//! service. No HTTP or storage code lives here.

pub mod error;
pub mod ports;
pub mod types;

pub use error::{CotacaoError, Result};
pub use types::identity::Identity;
pub use types::quote::{AtualizaCotacao, Cotacao, NovaCotacao};
pub use types::session::{BootstrapToken, Session};
