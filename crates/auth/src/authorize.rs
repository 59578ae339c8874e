use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::{AuthError, Claims, CredentialStore, Principal, Scope, TokenCodec, TokenError};

/// Outcome of authorizing one request.
///
/// Every rejection is terminal and says why; callers must branch on it.
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthDecision {
    Allowed(Principal),
    Denied(AuthError),
}

impl AuthDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AuthDecision::Allowed(_))
    }

    pub fn into_result(self) -> Result<Principal, AuthError> {
        match self {
            AuthDecision::Allowed(principal) => Ok(principal),
            AuthDecision::Denied(err) => Err(err),
        }
    }
}

impl From<Result<Principal, AuthError>> for AuthDecision {
    fn from(value: Result<Principal, AuthError>) -> Self {
        match value {
            Ok(principal) => AuthDecision::Allowed(principal),
            Err(err) => AuthDecision::Denied(err),
        }
    }
}

/// Check that every required scope was granted.
///
/// - No IO
/// - No panics
/// - Pure policy check; an empty requirement always passes
pub fn check_scopes(granted: &[Scope], required: &[Scope]) -> Result<(), AuthError> {
    match required.iter().find(|s| !granted.contains(s)) {
        Some(missing) => Err(AuthError::InsufficientScope {
            missing: missing.clone(),
        }),
        None => Ok(()),
    }
}

/// Turns a bearer token plus an endpoint's required scopes into a decision.
///
/// Order of checks: token (signature, then expiry) → subject lookup → enabled
/// flag → scopes. The first failing step decides the reason.
#[derive(Debug)]
pub struct ScopeAuthorizer<S> {
    codec: Arc<TokenCodec>,
    store: S,
}

impl<S> ScopeAuthorizer<S>
where
    S: CredentialStore,
{
    pub fn new(codec: Arc<TokenCodec>, store: S) -> Self {
        Self { codec, store }
    }

    pub fn codec(&self) -> &TokenCodec {
        &self.codec
    }

    pub fn authorize(&self, token: &str, required: &[Scope]) -> AuthDecision {
        self.authorize_at(token, required, Utc::now())
    }

    pub fn authorize_at(&self, token: &str, required: &[Scope], now: DateTime<Utc>) -> AuthDecision {
        let decision: AuthDecision = self.evaluate(token, required, now).into();
        if let AuthDecision::Denied(reason) = &decision {
            tracing::debug!(reason = reason.code(), "authorization denied");
        }
        decision
    }

    fn evaluate(&self, token: &str, required: &[Scope], now: DateTime<Utc>) -> Result<Principal, AuthError> {
        let claims = self.decode(token, now)?;

        let principal = self
            .store
            .find_by_identifier(&claims.sub)
            .ok_or(AuthError::BadCredentials)?;

        if !principal.is_active() {
            return Err(AuthError::InactivePrincipal);
        }

        check_scopes(&claims.scopes, required)?;
        Ok(principal)
    }

    fn decode(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, AuthError> {
        self.codec.verify_at(token, now).map_err(|e| match e {
            TokenError::Expired => AuthError::ExpiredToken,
            TokenError::Invalid | TokenError::InvalidTtl | TokenError::Encoding(_) => {
                AuthError::InvalidToken
            }
        })
    }
}
