use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;

use super::errors::PasswordError;

/// Plaintext behind the decoy hash. Never matches a real login because
/// `verify_decoy` discards the comparison result.
const DECOY_PASSWORD: &str = "decoy-password-for-unknown-accounts";

static DECOY_HASH: OnceLock<Option<String>> = OnceLock::new();

/// Password hashing implementation.
///
/// Provides cryptographic password hashing (internally uses Argon2id with the
/// library's default cost parameters).
pub struct PasswordHasher;

impl PasswordHasher {
    /// Create a new password hasher instance.
    ///
    /// The decoy hash is computed here on first construction, so no login
    /// pays for producing it.
    pub fn new() -> Self {
        let hasher = Self;
        hasher.decoy_hash();
        hasher
    }

    fn decoy_hash(&self) -> Option<&'static str> {
        DECOY_HASH
            .get_or_init(|| self.hash(DECOY_PASSWORD).ok())
            .as_deref()
    }

    /// Hash a plaintext password with a fresh random salt.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Salt generation or hashing failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a plaintext password against a stored hash.
    ///
    /// The comparison itself is constant-time; a mismatch is `Ok(false)`.
    ///
    /// # Arguments
    /// * `hash` - Stored password hash in PHC string format
    /// * `password` - Plaintext password to verify
    ///
    /// # Errors
    /// * `InvalidHash` - `hash` is not a parseable PHC string
    pub fn verify(&self, hash: &str, password: &str) -> Result<bool, PasswordError> {
        let parsed_hash =
            PasswordHash::new(hash).map_err(|e| PasswordError::InvalidHash(e.to_string()))?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Run a full verification against a decoy hash and report a mismatch.
    ///
    /// Used when no stored hash exists for the caller, so the unknown-account
    /// path spends the same work as a wrong password.
    pub fn verify_decoy(&self, password: &str) -> bool {
        if let Some(decoy) = self.decoy_hash() {
            let _ = self.verify(decoy, password);
        }

        false
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
