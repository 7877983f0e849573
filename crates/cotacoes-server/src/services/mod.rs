//! Business logic services

pub mod auth;
pub mod bootstrap;
pub mod quotes;
pub mod sessions;

pub use auth::AuthService;
pub use bootstrap::BootstrapRegistry;
pub use quotes::QuoteService;
pub use sessions::SessionRegistry;
