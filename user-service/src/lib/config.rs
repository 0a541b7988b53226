use std::env;
use std::time::Duration;

use config::Config as ConfigBuilder;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub database: DatabaseConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    #[serde(default)]
    pub cookie: CookieConfig,
    #[serde(default)]
    pub store: StoreConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct DatabaseConfig {
    pub url: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub http_port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct JwtConfig {
    pub secret: String,
    #[serde(default = "default_issuer")]
    pub issuer: String,
    #[serde(default = "default_token_expiration_hours")]
    pub expiration_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CookieConfig {
    #[serde(default = "default_cookie_name")]
    pub name: String,
    /// Send the cookie over HTTPS only. Off by default; enable in any
    /// deployment that terminates TLS.
    #[serde(default)]
    pub secure: bool,
    #[serde(default = "default_cookie_expiration_hours")]
    pub expiration_hours: i64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct StoreConfig {
    /// Budget for all store access within one service operation.
    #[serde(default = "default_store_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for CookieConfig {
    fn default() -> Self {
        Self {
            name: default_cookie_name(),
            secure: false,
            expiration_hours: default_cookie_expiration_hours(),
        }
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_store_timeout_secs(),
        }
    }
}

impl StoreConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn default_issuer() -> String {
    auth::DEFAULT_ISSUER.to_string()
}

fn default_token_expiration_hours() -> i64 {
    24
}

fn default_cookie_name() -> String {
    auth::cookie::DEFAULT_COOKIE_NAME.to_string()
}

fn default_cookie_expiration_hours() -> i64 {
    72
}

fn default_store_timeout_secs() -> u64 {
    5
}

impl Config {
    /// Load configuration from files with environment variable overrides
    ///
    /// Priority (highest to lowest):
    /// 1. Environment variables (DATABASE__URL, JWT__SECRET, etc.)
    /// 2. Environment-specific config file (config/{environment}.toml)
    /// 3. Default config file (config/default.toml)
    ///
    /// A missing or empty `jwt.secret` is an error: the service cannot run
    /// without a signing key.
    pub fn load() -> Result<Self, ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".to_string());

        let configuration = ConfigBuilder::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false))
            // Example: JWT__SECRET=... overrides jwt.secret
            .add_source(Environment::default().separator("__"))
            .build()?;

        let config: Config = configuration.try_deserialize()?;
        config.validate()?;

        Ok(config)
    }

    /// Reject configurations the service must not start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::Message(
                "jwt.secret must be set to a non-empty value".to_string(),
            ));
        }

        if self.jwt.expiration_hours <= 0 {
            return Err(ConfigError::Message(
                "jwt.expiration_hours must be positive".to_string(),
            ));
        }

        if self.cookie.expiration_hours <= 0 {
            return Err(ConfigError::Message(
                "cookie.expiration_hours must be positive".to_string(),
            ));
        }

        if self.store.timeout_secs == 0 {
            return Err(ConfigError::Message(
                "store.timeout_secs must be positive".to_string(),
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_secret(secret: &str) -> Config {
        Config {
            database: DatabaseConfig {
                url: "postgresql://localhost/users".to_string(),
            },
            server: ServerConfig { http_port: 4000 },
            jwt: JwtConfig {
                secret: secret.to_string(),
                issuer: default_issuer(),
                expiration_hours: 24,
            },
            cookie: CookieConfig::default(),
            store: StoreConfig::default(),
        }
    }

    #[test]
    fn test_validate_accepts_secret() {
        assert!(config_with_secret("a-long-enough-signing-secret").validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_secret() {
        assert!(config_with_secret("").validate().is_err());
        assert!(config_with_secret("   ").validate().is_err());
    }

    #[test]
    fn test_defaults() {
        let cookie = CookieConfig::default();
        assert_eq!(cookie.name, "session_token");
        assert!(!cookie.secure);
        assert_eq!(cookie.expiration_hours, 72);
        assert_eq!(StoreConfig::default().timeout(), Duration::from_secs(5));
    }

    #[test]
    fn test_load_reads_secret_from_environment() {
        // Run from the package root, where config/default.toml ships an empty secret.
        env::set_var("JWT__SECRET", "secret-from-environment");
        let loaded = Config::load();
        env::remove_var("JWT__SECRET");

        let config = loaded.expect("JWT__SECRET should satisfy jwt.secret");
        assert_eq!(config.jwt.secret, "secret-from-environment");
        assert_eq!(config.jwt.issuer, "user-service");
    }
}
