// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Password hashing with bcrypt.

use thiserror::Error;

/// Default bcrypt cost factor.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

#[derive(Debug, Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordError(String);

/// Salted, slow one-way hashing of user passwords.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    /// Create a hasher with the given bcrypt cost (4..=31).
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash `plaintext` with a fresh random salt.
    ///
    /// # Errors
    /// Returns `PasswordError` if bcrypt rejects the cost or fails internally.
    pub fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        bcrypt::hash(plaintext, self.cost).map_err(|e| PasswordError(e.to_string()))
    }

    /// Check `plaintext` against a stored hash. Malformed hashes verify as `false`.
    pub fn verify(&self, plaintext: &str, hash: &str) -> bool {
        bcrypt::verify(plaintext, hash).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Minimum bcrypt cost keeps the suite fast.
    fn hasher() -> PasswordHasher {
        PasswordHasher::new(4)
    }

    #[test]
    fn hash_then_verify_round_trips() {
        let hash = hasher().hash("ValidPass1!").unwrap();
        assert_ne!(hash, "ValidPass1!");
        assert!(hasher().verify("ValidPass1!", &hash));
    }

    #[test]
    fn wrong_password_does_not_verify() {
        let hash = hasher().hash("ValidPass1!").unwrap();
        assert!(!hasher().verify("ValidPass2!", &hash));
    }

    #[test]
    fn same_plaintext_hashes_differently() {
        let a = hasher().hash("ValidPass1!").unwrap();
        let b = hasher().hash("ValidPass1!").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn malformed_hash_is_false_not_error() {
        assert!(!hasher().verify("ValidPass1!", "not-a-bcrypt-hash"));
        assert!(!hasher().verify("ValidPass1!", ""));
    }

    #[test]
    fn hash_carries_configured_cost() {
        let hash = hasher().hash("ValidPass1!").unwrap();
        assert!(hash.starts_with("$2b$04$"), "{hash}");
    }

    #[test]
    fn invalid_cost_is_an_error() {
        assert!(PasswordHasher::new(2).hash("ValidPass1!").is_err());
    }
}
