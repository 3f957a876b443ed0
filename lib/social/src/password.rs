//! Password storage using bcrypt.
//!
//! Plaintext passwords are never persisted; only the bcrypt hash is kept
//! on the user record. The hash string is excluded from serialized user
//! representations at the API layer.

use crate::error::PasswordError;
use serde::{Deserialize, Serialize};

/// A bcrypt password hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hashes a plaintext password with the default bcrypt cost.
    pub fn generate(plaintext: &str) -> Result<Self, PasswordError> {
        bcrypt::hash(plaintext, bcrypt::DEFAULT_COST)
            .map(Self)
            .map_err(|e| PasswordError::HashFailed {
                reason: e.to_string(),
            })
    }

    /// Reconstitutes a hash from its stored string form.
    #[must_use]
    pub fn from_stored(hash: String) -> Self {
        Self(hash)
    }

    /// Verifies a plaintext password against this hash.
    ///
    /// Returns `Ok(true)` on a match, `Ok(false)` on a mismatch, and an
    /// error only if the stored hash itself is malformed.
    pub fn verify(&self, plaintext: &str) -> Result<bool, PasswordError> {
        bcrypt::verify(plaintext, &self.0).map_err(|e| PasswordError::VerifyFailed {
            reason: e.to_string(),
        })
    }

    /// Returns the stored hash string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}
