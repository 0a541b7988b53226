use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::jwt::UserClaims;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

pub const DEFAULT_ISSUER: &str = "user-service";

/// Authentication coordinator combining password verification and JWT generation.
///
/// Holds the signing secret for its whole lifetime; construct it once at
/// startup and share it behind an `Arc`.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    issuer: String,
    token_lifetime: Duration,
}

/// Result of successful authentication.
pub struct AuthenticationResult {
    /// JWT access token
    pub access_token: String,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator with the default issuer and a 24 hour
    /// token lifetime.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for JWT signing
    pub fn new(jwt_secret: &[u8]) -> Self {
        Self::with_issuer(jwt_secret, DEFAULT_ISSUER)
    }

    /// Create a new authenticator that issues and accepts tokens for `issuer`.
    pub fn with_issuer(jwt_secret: &[u8], issuer: impl Into<String>) -> Self {
        let issuer = issuer.into();

        Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret, &issuer),
            issuer,
            token_lifetime: Duration::hours(24),
        }
    }

    /// Set the time between issuance and expiry of new tokens.
    pub fn with_token_lifetime(mut self, token_lifetime: Duration) -> Self {
        self.token_lifetime = token_lifetime;
        self
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a plaintext password against a stored hash.
    ///
    /// # Errors
    /// * `InvalidHash` - Stored hash is malformed
    pub fn verify_password(&self, stored_hash: &str, password: &str) -> Result<bool, PasswordError> {
        self.password_hasher.verify(stored_hash, password)
    }

    /// Spend one password verification for an account that does not exist.
    pub fn reject_unknown_account(&self, password: &str) {
        self.password_hasher.verify_decoy(password);
    }

    /// Verify credentials and generate JWT token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `user` - Identity fields to embed in the token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `PasswordError` - Stored hash is malformed
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        user: &UserClaims,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(stored_hash, password)? {
            return Err(AuthenticationError::InvalidCredentials);
        }

        let access_token = self.issue_token(user)?;

        Ok(AuthenticationResult { access_token })
    }

    /// Issue a signed session token for a user without password verification.
    ///
    /// # Errors
    /// * `SigningFailed` - Token generation failed
    pub fn issue_token(&self, user: &UserClaims) -> Result<String, JwtError> {
        let claims = Claims::for_user(user.clone(), self.issuer.as_str(), self.token_lifetime);
        self.jwt_handler.encode(&claims)
    }

    /// Validate and decode a session token.
    ///
    /// # Errors
    /// * `TokenInvalid` - Bad signature, malformed token or unexpected algorithm
    /// * `TokenExpired` - Outside the `nbf`..`exp` window
    /// * `MissingClaims` - A user claim is absent or mistyped
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
