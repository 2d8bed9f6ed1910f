//! Server configuration loaded from environment variables.
//!
//! All settings have defaults so the server can start with zero
//! configuration for local development. Outside development,
//! [`ServerConfig::validate`] refuses to start without a real signing
//! secret.

use std::net::SocketAddr;
use std::path::PathBuf;

use ideaboard_shared::constants::{
    DEFAULT_HTTP_PORT, MIN_SECRET_LEN, RATE_LIMIT_MAX, RATE_LIMIT_WINDOW_SECS,
};

/// Signing secret used in development when `JWT_SECRET` is unset.
pub const DEV_JWT_SECRET: &str = "dev-only-insecure-secret-change-me-before-deploying";

/// Deployment mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    fn parse(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" | "local" | "test" => Environment::Development,
            _ => Environment::Production,
        }
    }
}

/// Server configuration.
#[derive(Clone)]
pub struct ServerConfig {
    /// Socket address for the HTTP (axum) API server.
    /// Env: `HTTP_ADDR`
    /// Default: `0.0.0.0:3000`
    pub http_addr: SocketAddr,

    /// SQLite database file.
    /// Env: `DATABASE_PATH`
    /// Default: `./ideaboard.db`
    pub database_path: PathBuf,

    /// Env: `APP_ENV` (`development` or anything else for production)
    /// Default: development
    pub environment: Environment,

    /// HS256 signing secret for identity tokens.
    /// Env: `JWT_SECRET`
    /// Default: none; development falls back to [`DEV_JWT_SECRET`].
    pub jwt_secret: Option<String>,

    /// Requests allowed per client IP per window.
    /// Env: `RATE_LIMIT_MAX`
    /// Default: `100`
    pub rate_limit_max: u32,

    /// Rate-limit window length in seconds.
    /// Env: `RATE_LIMIT_WINDOW_SECS`
    /// Default: `900` (15 minutes)
    pub rate_limit_window_secs: u64,

    /// `username:password` of a founder account created at startup if
    /// missing.
    /// Env: `BOOTSTRAP_FOUNDER`
    pub bootstrap_founder: Option<(String, String)>,
}

impl std::fmt::Debug for ServerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServerConfig")
            .field("http_addr", &self.http_addr)
            .field("database_path", &self.database_path)
            .field("environment", &self.environment)
            .field("jwt_secret", &self.jwt_secret.as_ref().map(|_| "<redacted>"))
            .field("rate_limit_max", &self.rate_limit_max)
            .field("rate_limit_window_secs", &self.rate_limit_window_secs)
            .field(
                "bootstrap_founder",
                &self.bootstrap_founder.as_ref().map(|(user, _)| user),
            )
            .finish()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_addr: ([0, 0, 0, 0], DEFAULT_HTTP_PORT).into(),
            database_path: PathBuf::from("./ideaboard.db"),
            environment: Environment::Development,
            jwt_secret: None,
            rate_limit_max: RATE_LIMIT_MAX,
            rate_limit_window_secs: RATE_LIMIT_WINDOW_SECS,
            bootstrap_founder: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables, falling back to defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(addr) = get("HTTP_ADDR") {
            if let Ok(parsed) = addr.parse::<SocketAddr>() {
                config.http_addr = parsed;
            } else {
                tracing::warn!(value = %addr, "Invalid HTTP_ADDR, using default");
            }
        }

        if let Some(path) = get("DATABASE_PATH") {
            config.database_path = PathBuf::from(path);
        }

        if let Some(env) = get("APP_ENV") {
            config.environment = Environment::parse(&env);
        }

        if let Some(secret) = get("JWT_SECRET") {
            if !secret.is_empty() {
                config.jwt_secret = Some(secret);
            }
        }

        if let Some(val) = get("RATE_LIMIT_MAX") {
            match val.parse::<u32>() {
                Ok(n) if n > 0 => config.rate_limit_max = n,
                _ => tracing::warn!(value = %val, "Invalid RATE_LIMIT_MAX, using default"),
            }
        }

        if let Some(val) = get("RATE_LIMIT_WINDOW_SECS") {
            match val.parse::<u64>() {
                Ok(n) if n > 0 => config.rate_limit_window_secs = n,
                _ => tracing::warn!(value = %val, "Invalid RATE_LIMIT_WINDOW_SECS, using default"),
            }
        }

        if let Some(val) = get("BOOTSTRAP_FOUNDER") {
            match val.split_once(':') {
                Some((user, pass)) if !user.is_empty() && !pass.is_empty() => {
                    config.bootstrap_founder = Some((user.to_string(), pass.to_string()));
                }
                _ => tracing::warn!("Invalid BOOTSTRAP_FOUNDER, expected username:password"),
            }
        }

        // RUST_LOG is handled directly by tracing-subscriber's EnvFilter,
        // so we do not store it here.

        config
    }

    /// Deployment checks. Outside development a signing secret of at
    /// least [`MIN_SECRET_LEN`] bytes is mandatory.
    pub fn validate(&self) -> Result<(), String> {
        if self.environment == Environment::Development {
            return Ok(());
        }

        match &self.jwt_secret {
            None => Err("JWT_SECRET must be set outside development".into()),
            Some(s) if s == DEV_JWT_SECRET => {
                Err("JWT_SECRET must not be the development secret".into())
            }
            Some(s) if s.len() < MIN_SECRET_LEN => Err(format!(
                "JWT_SECRET must be at least {MIN_SECRET_LEN} characters"
            )),
            Some(_) => Ok(()),
        }
    }

    /// The secret tokens are signed with.
    pub fn signing_secret(&self) -> &str {
        match &self.jwt_secret {
            Some(secret) => secret,
            None => DEV_JWT_SECRET,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = ServerConfig::default();
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 3000).into());
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.rate_limit_max, 100);
        assert_eq!(config.rate_limit_window_secs, 900);
        assert!(config.validate().is_ok());
        assert_eq!(config.signing_secret(), DEV_JWT_SECRET);
    }

    #[test]
    fn production_requires_a_real_secret() {
        let missing = ServerConfig::from_lookup(lookup(&[("APP_ENV", "production")]));
        assert!(missing.validate().is_err());

        let short = ServerConfig::from_lookup(lookup(&[
            ("APP_ENV", "production"),
            ("JWT_SECRET", "short"),
        ]));
        assert!(short.validate().is_err());

        let dev_secret = ServerConfig::from_lookup(lookup(&[
            ("APP_ENV", "production"),
            ("JWT_SECRET", DEV_JWT_SECRET),
        ]));
        assert!(dev_secret.validate().is_err());

        let good = ServerConfig::from_lookup(lookup(&[
            ("APP_ENV", "production"),
            ("JWT_SECRET", &"k".repeat(48)),
        ]));
        assert!(good.validate().is_ok());
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("HTTP_ADDR", "not-an-addr"),
            ("RATE_LIMIT_MAX", "zero"),
            ("BOOTSTRAP_FOUNDER", "nocolon"),
        ]));
        assert_eq!(config.http_addr, ([0, 0, 0, 0], 3000).into());
        assert_eq!(config.rate_limit_max, 100);
        assert!(config.bootstrap_founder.is_none());
    }

    #[test]
    fn bootstrap_founder_parses() {
        let config = ServerConfig::from_lookup(lookup(&[("BOOTSTRAP_FOUNDER", "ada:s3cret:pw")]));
        assert_eq!(
            config.bootstrap_founder,
            Some(("ada".to_string(), "s3cret:pw".to_string()))
        );
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = ServerConfig::from_lookup(lookup(&[
            ("JWT_SECRET", "super-secret-value"),
            ("BOOTSTRAP_FOUNDER", "ada:pw123456"),
        ]));
        let printed = format!("{config:?}");
        assert!(!printed.contains("super-secret-value"));
        assert!(!printed.contains("pw123456"));
    }
}
