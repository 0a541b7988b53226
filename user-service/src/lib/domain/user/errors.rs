use std::time::Duration;

use thiserror::Error;

/// Input rejected before any store access.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Invalid email format: {0}")]
    InvalidEmail(String),

    #[error("Invalid user ID: {0}")]
    InvalidUserId(String),
}

/// Every failure the authentication service and request authenticator can
/// report. Raw store and crypto errors are folded into one of these.
#[derive(Debug, Clone, Error)]
pub enum UserError {
    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("User already exists: {0}")]
    UserAlreadyExists(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Token signing failed: {0}")]
    SigningFailed(String),

    #[error("Token is invalid: {0}")]
    TokenInvalid(String),

    #[error("Token is expired")]
    TokenExpired,

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    // Infrastructure errors
    #[error("Credential store unavailable: {0}")]
    StoreUnavailable(String),

    #[error("Credential store did not answer within {0:?}")]
    StoreTimeout(Duration),

    #[error("Failed to write session cookie: {0}")]
    CookieWriteFailed(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

impl From<auth::PasswordError> for UserError {
    fn from(err: auth::PasswordError) -> Self {
        match err {
            auth::PasswordError::HashingFailed(msg) | auth::PasswordError::InvalidHash(msg) => {
                UserError::HashingFailed(msg)
            }
        }
    }
}

impl From<auth::JwtError> for UserError {
    fn from(err: auth::JwtError) -> Self {
        match err {
            auth::JwtError::SigningFailed(msg) => UserError::SigningFailed(msg),
            auth::JwtError::TokenInvalid(msg) | auth::JwtError::MissingClaims(msg) => {
                UserError::TokenInvalid(msg)
            }
            auth::JwtError::TokenExpired => UserError::TokenExpired,
        }
    }
}

impl From<auth::CookieError> for UserError {
    fn from(err: auth::CookieError) -> Self {
        match err {
            auth::CookieError::WriteFailed(msg) => UserError::CookieWriteFailed(msg),
        }
    }
}

impl From<auth::AuthenticationError> for UserError {
    fn from(err: auth::AuthenticationError) -> Self {
        match err {
            auth::AuthenticationError::InvalidCredentials => UserError::InvalidCredentials,
            auth::AuthenticationError::PasswordError(e) => e.into(),
            auth::AuthenticationError::JwtError(e) => e.into(),
        }
    }
}

impl From<anyhow::Error> for UserError {
    fn from(err: anyhow::Error) -> Self {
        UserError::Unknown(err.to_string())
    }
}
