//! Signed, expiring access tokens (JWT, HMAC family).

use std::str::FromStr;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use thiserror::Error;

use crate::{AuthConfig, Claims, ConfigError, Principal, Scope};

/// Symmetric algorithms a [`TokenCodec`] can be configured with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SigningAlgorithm {
    #[default]
    Hs256,
    Hs384,
    Hs512,
}

impl SigningAlgorithm {
    pub fn as_str(&self) -> &'static str {
        match self {
            SigningAlgorithm::Hs256 => "HS256",
            SigningAlgorithm::Hs384 => "HS384",
            SigningAlgorithm::Hs512 => "HS512",
        }
    }

    fn jwt_algorithm(self) -> Algorithm {
        match self {
            SigningAlgorithm::Hs256 => Algorithm::HS256,
            SigningAlgorithm::Hs384 => Algorithm::HS384,
            SigningAlgorithm::Hs512 => Algorithm::HS512,
        }
    }
}

impl FromStr for SigningAlgorithm {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "HS256" => Ok(SigningAlgorithm::Hs256),
            "HS384" => Ok(SigningAlgorithm::Hs384),
            "HS512" => Ok(SigningAlgorithm::Hs512),
            _ => Err(ConfigError::UnsupportedAlgorithm(s.to_string())),
        }
    }
}

impl core::fmt::Display for SigningAlgorithm {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    /// Malformed structure, bad signature, or a header algorithm other than the
    /// configured one.
    #[error("invalid token")]
    Invalid,

    #[error("token has expired")]
    Expired,

    /// Lifetimes are whole seconds and must be at least one.
    #[error("token lifetime must be at least one second")]
    InvalidTtl,

    #[error("token encoding failed: {0}")]
    Encoding(String),
}

/// Issues and verifies access tokens with one process-wide secret.
///
/// Holds no per-call state; share it behind an `Arc`.
#[derive(Clone)]
pub struct TokenCodec {
    algorithm: SigningAlgorithm,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
}

impl TokenCodec {
    pub fn new(
        secret: &[u8],
        algorithm: SigningAlgorithm,
        default_ttl: Duration,
    ) -> Result<Self, ConfigError> {
        if secret.is_empty() {
            return Err(ConfigError::EmptySecret);
        }
        if default_ttl.num_seconds() <= 0 {
            return Err(ConfigError::InvalidTtl(default_ttl.num_minutes()));
        }

        // Only the configured algorithm is accepted. Expiry is checked by us
        // against the caller's clock, with no leeway.
        let mut validation = Validation::new(algorithm.jwt_algorithm());
        validation.validate_exp = false;
        validation.leeway = 0;
        validation.required_spec_claims = ["exp", "sub"].into_iter().map(String::from).collect();

        Ok(Self {
            algorithm,
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            default_ttl,
        })
    }

    pub fn from_config(config: &AuthConfig) -> Result<Self, ConfigError> {
        Self::new(
            config.secret.as_bytes(),
            config.signing_algorithm()?,
            config.access_token_ttl()?,
        )
    }

    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Issue a token for `principal` carrying `scopes`, valid for `ttl`
    /// (the configured default when `None`).
    pub fn issue(
        &self,
        principal: &Principal,
        scopes: &[Scope],
        ttl: Option<Duration>,
    ) -> Result<String, TokenError> {
        self.issue_at(principal, scopes, ttl, Utc::now())
    }

    pub fn issue_at(
        &self,
        principal: &Principal,
        scopes: &[Scope],
        ttl: Option<Duration>,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let ttl = ttl.unwrap_or(self.default_ttl);
        if ttl.num_seconds() <= 0 {
            return Err(TokenError::InvalidTtl);
        }

        let claims = Claims::new(principal.identifier.clone(), scopes.to_vec(), now, ttl);
        let token = self.encode(&claims)?;
        tracing::debug!(subject = %claims.sub, exp = claims.exp, "access token issued");
        Ok(token)
    }

    /// Sign arbitrary claims as-is.
    pub fn encode(&self, claims: &Claims) -> Result<String, TokenError> {
        encode(
            &Header::new(self.algorithm.jwt_algorithm()),
            claims,
            &self.encoding_key,
        )
        .map_err(|e| TokenError::Encoding(e.to_string()))
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, TokenError> {
        let data = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            tracing::debug!(reason = ?e.kind(), "access token rejected");
            TokenError::Invalid
        })?;

        let claims = data.claims;
        if claims.is_expired_at(now) {
            tracing::debug!(subject = %claims.sub, exp = claims.exp, "access token expired");
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

impl core::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("TokenCodec")
            .field("algorithm", &self.algorithm)
            .field("default_ttl", &self.default_ttl)
            .finish_non_exhaustive()
    }
}
