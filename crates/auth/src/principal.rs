use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::Scope;

/// Stored password hash (bcrypt PHC-like string).
///
/// Opaque on purpose: `Debug` never prints the hash.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Wrap a hash read back from storage.
    pub fn from_stored(hash: impl Into<String>) -> Self {
        Self(hash.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("PasswordHash(<redacted>)")
    }
}

/// Identity that can authenticate and be authorized.
///
/// Owned by the credential store; the auth core only reads it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    /// Unique identifier (an email address in practice).
    pub identifier: String,
    pub password_hash: PasswordHash,
    /// Active unless explicitly disabled.
    pub disabled: bool,
    /// Scopes this principal may be issued.
    pub scopes: Vec<Scope>,
}

impl Principal {
    pub fn new(identifier: impl Into<String>, password_hash: PasswordHash) -> Self {
        Self {
            identifier: identifier.into(),
            password_hash,
            disabled: false,
            scopes: Vec::new(),
        }
    }

    pub fn with_scopes(mut self, scopes: impl IntoIterator<Item = Scope>) -> Self {
        self.scopes = scopes.into_iter().collect();
        self
    }

    pub fn with_disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn is_active(&self) -> bool {
        !self.disabled
    }

    pub fn has_scope(&self, scope: &Scope) -> bool {
        self.scopes.contains(scope)
    }

    /// Scopes to embed in a token given what the client asked for.
    ///
    /// An empty request means "everything I hold". Requested scopes the principal
    /// does not hold are silently dropped.
    pub fn grantable_scopes(&self, requested: &[Scope]) -> Vec<Scope> {
        if requested.is_empty() {
            return self.scopes.clone();
        }
        requested
            .iter()
            .filter(|s| self.has_scope(s))
            .cloned()
            .collect()
    }
}

/// Read-only principal lookup consumed by the auth core.
///
/// Implementations own their concurrency story (lock, pool, ...); callers may
/// invoke this from many threads at once.
pub trait CredentialStore: Send + Sync {
    fn find_by_identifier(&self, identifier: &str) -> Option<Principal>;
}

impl<S> CredentialStore for Arc<S>
where
    S: CredentialStore + ?Sized,
{
    fn find_by_identifier(&self, identifier: &str) -> Option<Principal> {
        (**self).find_by_identifier(identifier)
    }
}
