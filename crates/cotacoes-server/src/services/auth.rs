//! Credential verification service
//!
//! Ordered fallback chain: signed token first, static machine token
//! last. Evaluation short-circuits on the first acceptance.

use cotacoes_core::ports::{CredentialVerifier, Verification};
use cotacoes_core::Identity;
use jsonwebtoken::{decode, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

pub struct AuthService {
    verifiers: Vec<Box<dyn CredentialVerifier>>,
}

impl AuthService {
    pub fn new(jwt_secret: String, static_token: String) -> Self {
        Self {
            verifiers: vec![
                Box::new(JwtVerifier::new(jwt_secret)),
                Box::new(StaticTokenVerifier::new(static_token)),
            ],
        }
    }

    /// Walk the verifier chain; first acceptance wins.
    pub fn verify_credential(&self, credential: &str) -> Verification {
        for verifier in &self.verifiers {
            if let Verification::Accepted(identity) = verifier.verify(credential) {
                return Verification::Accepted(identity);
            }
        }
        Verification::Rejected
    }
}

/// Claims embedded in a signed token. Expiry is carried by the token
/// itself and enforced during decoding.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub sub: String,
    pub name: String,
    pub admin: bool,
    pub exp: i64,
    pub iat: i64,
}

struct JwtVerifier {
    secret: String,
}

impl JwtVerifier {
    fn new(secret: String) -> Self {
        Self { secret }
    }
}

impl CredentialVerifier for JwtVerifier {
    fn verify(&self, credential: &str) -> Verification {
        let validation = Validation::default();
        match decode::<Claims>(
            credential,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        ) {
            Ok(data) => Verification::Accepted(Identity {
                username: data.claims.sub,
                display_name: data.claims.name,
                admin: data.claims.admin,
            }),
            Err(_) => Verification::Rejected,
        }
    }
}

struct StaticTokenVerifier {
    token: String,
}

impl StaticTokenVerifier {
    fn new(token: String) -> Self {
        Self { token }
    }
}

impl CredentialVerifier for StaticTokenVerifier {
    fn verify(&self, credential: &str) -> Verification {
        if credential == self.token {
            Verification::Accepted(Identity::machine())
        } else {
            Verification::Rejected
        }
    }
}
