use thiserror::Error;

/// Error type for JWT operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JwtError {
    #[error("Failed to sign token: {0}")]
    SigningFailed(String),

    #[error("Token is invalid: {0}")]
    TokenInvalid(String),

    #[error("Token is outside its validity window")]
    TokenExpired,

    /// Signature verified but the payload lacks a required, correctly typed claim.
    #[error("Token claims are incomplete: {0}")]
    MissingClaims(String),
}

impl JwtError {
    /// True for every failure that means "do not trust this token" other than
    /// the validity window.
    pub fn is_invalid(&self) -> bool {
        matches!(self, JwtError::TokenInvalid(_) | JwtError::MissingClaims(_))
    }
}
