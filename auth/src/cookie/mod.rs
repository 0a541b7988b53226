pub mod errors;
pub mod session;

pub use errors::CookieError;
pub use session::SessionCookieManager;
pub use session::DEFAULT_COOKIE_LIFETIME;
pub use session::DEFAULT_COOKIE_NAME;
