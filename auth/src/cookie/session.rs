use axum_extra::extract::cookie::Cookie;
use axum_extra::extract::cookie::CookieJar;
use axum_extra::extract::cookie::SameSite;
use http::HeaderValue;
use time::Duration;
use time::OffsetDateTime;

use super::errors::CookieError;

pub const DEFAULT_COOKIE_NAME: &str = "session_token";

/// Default cookie lifetime. Longer than the default token lifetime; a cookie
/// may outlive the token it carries, in which case the token is rejected on use.
pub const DEFAULT_COOKIE_LIFETIME: Duration = Duration::hours(72);

/// Sets and clears the session cookie that transports a session token.
///
/// Every cookie written is HttpOnly, `Path=/` and `SameSite=Lax`. The
/// `Secure` flag is deployment configuration and defaults to off.
#[derive(Debug, Clone)]
pub struct SessionCookieManager {
    name: String,
    secure: bool,
    lifetime: Duration,
}

impl SessionCookieManager {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            secure: false,
            lifetime: DEFAULT_COOKIE_LIFETIME,
        }
    }

    /// Set the `Secure` transport flag.
    pub fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Set how long a freshly set cookie lives.
    pub fn with_lifetime(mut self, lifetime: Duration) -> Self {
        self.lifetime = lifetime;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Add the session cookie carrying `token` to the jar.
    ///
    /// # Errors
    /// * `WriteFailed` - The cookie cannot be encoded as a `Set-Cookie` header
    pub fn set(&self, jar: CookieJar, token: &str) -> Result<CookieJar, CookieError> {
        let cookie = self.build(token.to_string(), OffsetDateTime::now_utc() + self.lifetime);
        Self::ensure_writable(&cookie)?;

        Ok(jar.add(cookie))
    }

    /// Overwrite the session cookie with an empty, already expired one.
    ///
    /// # Errors
    /// * `WriteFailed` - The cookie cannot be encoded as a `Set-Cookie` header
    pub fn clear(&self, jar: CookieJar) -> Result<CookieJar, CookieError> {
        let cookie = self.build(String::new(), OffsetDateTime::now_utc() - Duration::hours(1));
        Self::ensure_writable(&cookie)?;

        Ok(jar.add(cookie))
    }

    fn build(&self, value: String, expires: OffsetDateTime) -> Cookie<'static> {
        Cookie::build((self.name.clone(), value))
            .expires(expires)
            .http_only(true)
            .secure(self.secure)
            .path("/")
            .same_site(SameSite::Lax)
            .build()
    }

    fn ensure_writable(cookie: &Cookie<'_>) -> Result<(), CookieError> {
        HeaderValue::from_str(&cookie.to_string())
            .map(|_| ())
            .map_err(|e| CookieError::WriteFailed(e.to_string()))
    }
}

impl Default for SessionCookieManager {
    fn default() -> Self {
        Self::new(DEFAULT_COOKIE_NAME)
    }
}
