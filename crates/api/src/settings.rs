//! Process configuration read from the environment at startup.

use std::net::SocketAddr;

use catalog_auth::{AuthConfig, ConfigError};
use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";
const DEV_SECRET: &str = "dev-secret";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("{var} has invalid value '{value}': {reason}")]
    Invalid {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("{0} is set but {1} is missing")]
    Incomplete(&'static str, &'static str),

    #[error(transparent)]
    Auth(#[from] ConfigError),
}

/// Principal seeded at startup so a fresh deployment can log in.
#[derive(Clone)]
pub struct BootstrapUser {
    pub identifier: String,
    pub password: String,
}

impl core::fmt::Debug for BootstrapUser {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("BootstrapUser")
            .field("identifier", &self.identifier)
            .field("password", &"<redacted>")
            .finish()
    }
}

#[derive(Clone)]
pub struct Settings {
    pub auth: AuthConfig,
    pub bind_addr: SocketAddr,
    /// Postgres stores when set, in-memory otherwise. May carry credentials.
    pub database_url: Option<String>,
    pub bootstrap_user: Option<BootstrapUser>,
}

impl core::fmt::Debug for Settings {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Settings")
            .field("auth", &self.auth)
            .field("bind_addr", &self.bind_addr)
            .field("database_url", &self.database_url.as_ref().map(|_| "<redacted>"))
            .field("bootstrap_user", &self.bootstrap_user)
            .finish()
    }
}

impl Settings {
    pub fn from_env() -> Result<Self, SettingsError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from any key/value source. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, SettingsError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let secret = get("JWT_SECRET").unwrap_or_else(|| {
            tracing::warn!("JWT_SECRET not set; using insecure dev default");
            DEV_SECRET.to_string()
        });
        let mut auth = AuthConfig::new(secret);

        if let Some(algorithm) = get("JWT_ALGORITHM") {
            auth = auth.with_algorithm(algorithm);
        }
        if let Some(raw) = get("ACCESS_TOKEN_EXPIRE_MINUTES") {
            auth = auth.with_ttl_minutes(parse("ACCESS_TOKEN_EXPIRE_MINUTES", &raw)?);
        }
        if let Some(raw) = get("PASSWORD_COST") {
            auth = auth.with_password_cost(parse("PASSWORD_COST", &raw)?);
        }
        auth.validate()?;

        let bind_addr = match get("BIND_ADDR") {
            Some(raw) => parse("BIND_ADDR", &raw)?,
            None => parse("BIND_ADDR", DEFAULT_BIND_ADDR)?,
        };

        let bootstrap_user = match (get("BOOTSTRAP_USER"), get("BOOTSTRAP_PASSWORD")) {
            (Some(identifier), Some(password)) => Some(BootstrapUser { identifier, password }),
            (Some(_), None) => return Err(SettingsError::Incomplete("BOOTSTRAP_USER", "BOOTSTRAP_PASSWORD")),
            (None, Some(_)) => return Err(SettingsError::Incomplete("BOOTSTRAP_PASSWORD", "BOOTSTRAP_USER")),
            (None, None) => None,
        };

        Ok(Self {
            auth,
            bind_addr,
            database_url: get("DATABASE_URL"),
            bootstrap_user,
        })
    }
}

fn parse<T>(var: &'static str, raw: &str) -> Result<T, SettingsError>
where
    T: core::str::FromStr,
    T::Err: core::fmt::Display,
{
    raw.trim().parse().map_err(|e: T::Err| SettingsError::Invalid {
        var,
        value: raw.to_string(),
        reason: e.to_string(),
    })
}
