//! Authentication/authorization failure taxonomy.

use thiserror::Error;

use crate::Scope;

/// Why a credential, token or principal was rejected.
///
/// Carries no transport vocabulary; the HTTP layer decides status codes, using
/// [`AuthError::is_forbidden`] to split "who are you?" from "you may not".
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Unknown identifier or wrong password (deliberately indistinguishable),
    /// or a token whose subject no longer resolves.
    #[error("could not validate credentials")]
    BadCredentials,

    /// Malformed token, bad signature, or unexpected algorithm.
    #[error("invalid token")]
    InvalidToken,

    #[error("token has expired")]
    ExpiredToken,

    #[error("inactive principal")]
    InactivePrincipal,

    #[error("not enough permissions: missing scope '{missing}'")]
    InsufficientScope { missing: Scope },
}

impl AuthError {
    /// `true` when the caller is known but lacks permission.
    pub fn is_forbidden(&self) -> bool {
        matches!(self, AuthError::InsufficientScope { .. })
    }

    /// Stable machine-readable code.
    pub fn code(&self) -> &'static str {
        match self {
            AuthError::BadCredentials => "bad_credentials",
            AuthError::InvalidToken => "invalid_token",
            AuthError::ExpiredToken => "expired_token",
            AuthError::InactivePrincipal => "inactive_principal",
            AuthError::InsufficientScope { .. } => "insufficient_scope",
        }
    }
}
