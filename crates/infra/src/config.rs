//! Process configuration read from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use adminhub_auth::TokenValidation;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEFAULT_ROLE_LOOKUP_TIMEOUT_MS: u64 = 2_000;
const DEV_JWT_SECRET: &str = "dev-secret";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid {key}='{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

impl ConfigError {
    fn invalid(key: &'static str, value: &str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            value: value.to_string(),
            reason: reason.into(),
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// `BIND_ADDR`
    pub bind_addr: SocketAddr,
    /// `JWT_SECRET`, HS256 signing secret.
    pub jwt_secret: String,
    /// `ROLE_LOOKUP_TIMEOUT_MS`: upper bound for resolving a subject's roles.
    pub role_lookup_timeout: Duration,
    /// `TOKEN_VALIDATION`: how configured tokens are checked against the catalog.
    pub token_validation: TokenValidation,
    /// `MENU_CONFIG`: JSON menu tree; the built-in admin console menu when unset.
    pub menu_path: Option<PathBuf>,
    /// `BOOTSTRAP_ADMIN_PHONE`: user made administrator at startup.
    pub bootstrap_admin_phone: Option<String>,
}

impl core::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AppConfig")
            .field("bind_addr", &self.bind_addr)
            .field("jwt_secret", &"<redacted>")
            .field("role_lookup_timeout", &self.role_lookup_timeout)
            .field("token_validation", &self.token_validation)
            .field("menu_path", &self.menu_path)
            .field("bootstrap_admin_phone", &self.bootstrap_admin_phone)
            .finish()
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup. Unset and blank values take defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let bind_addr: SocketAddr = match var("BIND_ADDR") {
            Some(raw) => raw
                .parse()
                .map_err(|err: std::net::AddrParseError| ConfigError::invalid("BIND_ADDR", &raw, err.to_string()))?,
            None => DEFAULT_BIND_ADDR
                .parse()
                .map_err(|err: std::net::AddrParseError| {
                    ConfigError::invalid("BIND_ADDR", DEFAULT_BIND_ADDR, err.to_string())
                })?,
        };

        let jwt_secret = var("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_JWT_SECRET.to_string()
        });

        let role_lookup_timeout = match var("ROLE_LOOKUP_TIMEOUT_MS") {
            Some(raw) => {
                let ms: u64 = raw
                    .parse()
                    .map_err(|_| ConfigError::invalid("ROLE_LOOKUP_TIMEOUT_MS", &raw, "expected milliseconds"))?;
                if ms == 0 {
                    return Err(ConfigError::invalid("ROLE_LOOKUP_TIMEOUT_MS", &raw, "must be > 0"));
                }
                Duration::from_millis(ms)
            }
            None => Duration::from_millis(DEFAULT_ROLE_LOOKUP_TIMEOUT_MS),
        };

        let token_validation: TokenValidation = match var("TOKEN_VALIDATION") {
            Some(raw) => raw
                .parse()
                .map_err(|reason: String| ConfigError::invalid("TOKEN_VALIDATION", &raw, reason))?,
            None => TokenValidation::default(),
        };

        Ok(Self {
            bind_addr,
            jwt_secret,
            role_lookup_timeout,
            token_validation,
            menu_path: var("MENU_CONFIG").map(PathBuf::from),
            bootstrap_admin_phone: var("BOOTSTRAP_ADMIN_PHONE"),
        })
    }
}
