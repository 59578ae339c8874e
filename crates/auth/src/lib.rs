//! `catalog-auth`: authentication and scope-based authorization core.
//!
//! This crate is intentionally decoupled from HTTP and storage: it receives a
//! [`CredentialStore`] for principal lookups and an [`AuthConfig`] carrying the
//! signing secret, and returns discriminated results the caller must branch on.

pub mod authenticator;
pub mod authorize;
pub mod claims;
pub mod config;
pub mod error;
pub mod password;
pub mod principal;
pub mod scope;
pub mod token;

pub use authenticator::Authenticator;
pub use authorize::{AuthDecision, ScopeAuthorizer, check_scopes};
pub use claims::Claims;
pub use config::{AuthConfig, ConfigError};
pub use error::AuthError;
pub use password::{PasswordError, PasswordHasher};
pub use principal::{CredentialStore, PasswordHash, Principal};
pub use scope::{Scope, join_scopes, parse_scope_list};
pub use token::{SigningAlgorithm, TokenCodec, TokenError};

#[cfg(test)]
pub(crate) mod testing;
