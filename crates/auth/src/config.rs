//! Process-wide auth configuration.
//!
//! Loaded once at startup and handed to [`TokenCodec`](crate::TokenCodec) and
//! [`PasswordHasher`](crate::PasswordHasher) by value; nothing here is global.

use chrono::Duration;
use serde::Deserialize;
use thiserror::Error;

use crate::{PasswordError, SigningAlgorithm};

pub const DEFAULT_ALGORITHM: &str = "HS256";
pub const DEFAULT_ACCESS_TOKEN_TTL_MINUTES: i64 = 15;
pub const DEFAULT_PASSWORD_COST: u32 = bcrypt::DEFAULT_COST;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("signing secret must not be empty")]
    EmptySecret,

    #[error("unsupported signing algorithm '{0}' (expected HS256, HS384 or HS512)")]
    UnsupportedAlgorithm(String),

    #[error("access token ttl must be positive and representable (got {0} minutes)")]
    InvalidTtl(i64),

    #[error(transparent)]
    Password(#[from] PasswordError),
}

/// Signing and hashing settings.
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// Symmetric signing secret. Rotating it invalidates every outstanding token.
    pub secret: String,

    #[serde(default = "default_algorithm")]
    pub algorithm: String,

    #[serde(default = "default_ttl_minutes")]
    pub access_token_ttl_minutes: i64,

    #[serde(default = "default_password_cost")]
    pub password_cost: u32,
}

fn default_algorithm() -> String {
    DEFAULT_ALGORITHM.to_string()
}

fn default_ttl_minutes() -> i64 {
    DEFAULT_ACCESS_TOKEN_TTL_MINUTES
}

fn default_password_cost() -> u32 {
    DEFAULT_PASSWORD_COST
}

impl AuthConfig {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            algorithm: default_algorithm(),
            access_token_ttl_minutes: default_ttl_minutes(),
            password_cost: default_password_cost(),
        }
    }

    pub fn with_algorithm(mut self, algorithm: impl Into<String>) -> Self {
        self.algorithm = algorithm.into();
        self
    }

    pub fn with_ttl_minutes(mut self, minutes: i64) -> Self {
        self.access_token_ttl_minutes = minutes;
        self
    }

    pub fn with_password_cost(mut self, cost: u32) -> Self {
        self.password_cost = cost;
        self
    }

    pub fn signing_algorithm(&self) -> Result<SigningAlgorithm, ConfigError> {
        self.algorithm.parse()
    }

    pub fn access_token_ttl(&self) -> Result<Duration, ConfigError> {
        let minutes = self.access_token_ttl_minutes;
        if minutes <= 0 {
            return Err(ConfigError::InvalidTtl(minutes));
        }
        Duration::try_minutes(minutes).ok_or(ConfigError::InvalidTtl(minutes))
    }

    /// Check every field without building anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        self.signing_algorithm()?;
        self.access_token_ttl()?;
        if !(crate::password::MIN_COST..=crate::password::MAX_COST).contains(&self.password_cost) {
            return Err(PasswordError::InvalidCost(self.password_cost).into());
        }
        Ok(())
    }
}

impl core::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &"<redacted>")
            .field("algorithm", &self.algorithm)
            .field("access_token_ttl_minutes", &self.access_token_ttl_minutes)
            .field("password_cost", &self.password_cost)
            .finish()
    }
}
