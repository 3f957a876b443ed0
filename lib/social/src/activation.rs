//! Account activation tokens.
//!
//! Registration creates an inactive user plus an invitation row holding
//! the SHA-256 digest of a freshly generated token. The plaintext token
//! travels once: embedded in the activation URL mailed to the user, then
//! received back as a path parameter on `PUT /v1/users/activate/{token}`.
//! Only the digest is ever persisted.

use sha2::{Digest, Sha256};
use ulid::Ulid;

/// A freshly generated activation token.
///
/// Holds both the plaintext (for the activation URL) and its SHA-256 hex
/// digest (for storage). The plaintext is discarded once the welcome
/// email has been sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationToken {
    plaintext: String,
    hash: String,
}

impl ActivationToken {
    /// Generates a new random activation token.
    #[must_use]
    pub fn generate() -> Self {
        let plaintext = Ulid::new().to_string();
        let hash = hash_token(&plaintext);
        Self { plaintext, hash }
    }

    /// Returns the plaintext token for the activation URL.
    #[must_use]
    pub fn plaintext(&self) -> &str {
        &self.plaintext
    }

    /// Returns the SHA-256 hex digest stored in the invitation row.
    #[must_use]
    pub fn hash(&self) -> &str {
        &self.hash
    }
}

/// Computes the SHA-256 hex digest of a plaintext token.
///
/// Used on activation to look up the stored invitation.
#[must_use]
pub fn hash_token(plaintext: &str) -> String {
    let digest = Sha256::digest(plaintext.as_bytes());
    hex::encode(digest)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_matches_generated_token() {
        let token = ActivationToken::generate();
        assert_eq!(hash_token(token.plaintext()), token.hash());
    }

    #[test]
    fn hash_differs_from_plaintext() {
        let token = ActivationToken::generate();
        assert_ne!(token.plaintext(), token.hash());
    }

    #[test]
    fn hash_is_hex_sha256() {
        let token = ActivationToken::generate();
        assert_eq!(token.hash().len(), 64);
        assert!(token.hash().chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn hashing_is_deterministic() {
        assert_eq!(hash_token("some-token"), hash_token("some-token"));
        assert_ne!(hash_token("some-token"), hash_token("other-token"));
    }

    #[test]
    fn tokens_are_unique() {
        let a = ActivationToken::generate();
        let b = ActivationToken::generate();
        assert_ne!(a.plaintext(), b.plaintext());
    }
}
