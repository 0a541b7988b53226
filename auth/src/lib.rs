//! Authentication utilities library
//!
//! Provides the security-sensitive building blocks of the user service:
//! - Password hashing (Argon2id) with constant-time verification
//! - Session token issuing and validation (JWT, HS512 only)
//! - Session cookie handling
//! - Authentication coordination
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify(&hash, "my_password").unwrap());
//! ```
//!
//! ## Session Tokens
//! ```
//! use auth::{Authenticator, UserClaims};
//!
//! let auth = Authenticator::new(b"secret_key_at_least_64_bytes_long_for_hs512_signing_in_doctests");
//! let user = UserClaims {
//!     id: 1,
//!     name: "Ada".to_string(),
//!     last_name: "Lovelace".to_string(),
//!     email: "ada@example.com".to_string(),
//! };
//!
//! let token = auth.issue_token(&user).unwrap();
//! let claims = auth.validate_token(&token).unwrap();
//! assert_eq!(claims.user, user);
//! ```
//!
//! ## Session Cookies
//! ```
//! use auth::SessionCookieManager;
//! use axum_extra::extract::cookie::CookieJar;
//!
//! let cookies = SessionCookieManager::default();
//! let jar = cookies.set(CookieJar::new(), "token").unwrap();
//! assert_eq!(jar.get("session_token").unwrap().value(), "token");
//! ```

pub mod authenticator;
pub mod cookie;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::AuthenticationResult;
pub use authenticator::Authenticator;
pub use authenticator::DEFAULT_ISSUER;
pub use cookie::CookieError;
pub use cookie::SessionCookieManager;
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::UserClaims;
pub use password::PasswordError;
pub use password::PasswordHasher;
