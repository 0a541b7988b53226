use thiserror::Error;

/// Error type for session cookie operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CookieError {
    #[error("Failed to write session cookie: {0}")]
    WriteFailed(String),
}
