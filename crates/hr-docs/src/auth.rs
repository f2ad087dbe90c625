//! Operator authentication

use crate::config::CredentialsConfig;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;

/// Decides whether an operator may use the tool
pub trait IdentityProvider {
    fn authenticate(&self, username: &str, password: &str) -> bool;
}

/// Credentials taken from configuration; only a password digest is stored
#[derive(Debug, Clone)]
pub struct ConfiguredCredentials {
    username: String,
    password_sha256: String,
}

impl ConfiguredCredentials {
    pub fn new(username: impl Into<String>, password_sha256: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_sha256: password_sha256.into().trim().to_ascii_lowercase(),
        }
    }

    pub fn from_config(config: &CredentialsConfig) -> Self {
        Self::new(config.username.clone(), config.password_sha256.clone())
    }
}

/// Lowercase hex SHA-256 of a password
pub fn hash_password(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

impl IdentityProvider for ConfiguredCredentials {
    fn authenticate(&self, username: &str, password: &str) -> bool {
        let digest = hash_password(password);
        let ok = username == self.username
            && bool::from(digest.as_bytes().ct_eq(self.password_sha256.as_bytes()));
        if !ok {
            tracing::warn!(username, "authentication failed");
        }
        ok
    }
}
