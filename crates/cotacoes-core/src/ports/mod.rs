//! Port traits for pluggable collaborators

pub mod cache;
pub mod store;
pub mod verify;

pub use cache::QuoteCache;
pub use store::RecordStore;
pub use verify::{CredentialVerifier, Verification};
