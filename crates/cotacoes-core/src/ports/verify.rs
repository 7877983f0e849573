//! Credential verifier trait

use crate::types::identity::Identity;

/// Outcome of checking one presented credential.
#[derive(Debug, Clone)]
pub enum Verification {
    Accepted(Identity),
    Rejected,
}

/// One strategy in the ordered verifier chain (signed token first,
/// static fallback last). Evaluation short-circuits on the first
/// acceptance.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, credential: &str) -> Verification;
}
