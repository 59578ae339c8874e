//! Identifier + password → principal.

use crate::{AuthError, CredentialStore, PasswordHasher, Principal};

/// Checks credentials against a [`CredentialStore`].
///
/// Read-only. Unknown identifiers and wrong passwords produce the same error
/// and take the same time, so callers cannot enumerate accounts.
#[derive(Debug)]
pub struct Authenticator<S> {
    store: S,
    hasher: PasswordHasher,
}

impl<S> Authenticator<S>
where
    S: CredentialStore,
{
    pub fn new(store: S, hasher: PasswordHasher) -> Self {
        Self { store, hasher }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn hasher(&self) -> &PasswordHasher {
        &self.hasher
    }

    pub fn authenticate(&self, identifier: &str, password: &str) -> Result<Principal, AuthError> {
        let Some(principal) = self.store.find_by_identifier(identifier) else {
            self.hasher.verify_dummy(password);
            tracing::info!(reason = "unknown_identifier", "authentication rejected");
            return Err(AuthError::BadCredentials);
        };

        if !self.hasher.verify(password, &principal.password_hash) {
            tracing::info!(
                identifier = %principal.identifier,
                reason = "password_mismatch",
                "authentication rejected"
            );
            return Err(AuthError::BadCredentials);
        }

        tracing::debug!(identifier = %principal.identifier, "authenticated");
        Ok(principal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Scope;
    use crate::password::MIN_COST;
    use crate::testing::MapStore;

    fn authenticator() -> Authenticator<MapStore> {
        let hasher = PasswordHasher::new(MIN_COST).unwrap();
        let alice = Principal::new("alice@example.com", hasher.hash("wonderland").unwrap())
            .with_scopes([Scope::ACTIVE]);
        let bob = Principal::new("bob@example.com", hasher.hash("builder").unwrap())
            .with_disabled(true);
        Authenticator::new(MapStore::with([alice, bob]), hasher)
    }

    #[test]
    fn correct_password_returns_principal() {
        let principal = authenticator()
            .authenticate("alice@example.com", "wonderland")
            .unwrap();
        assert_eq!(principal.identifier, "alice@example.com");
        assert_eq!(principal.scopes, vec![Scope::ACTIVE]);
    }

    #[test]
    fn wrong_password_is_bad_credentials() {
        assert_eq!(
            authenticator().authenticate("alice@example.com", "WONDERLAND"),
            Err(AuthError::BadCredentials)
        );
    }

    #[test]
    fn unknown_identifier_is_indistinguishable() {
        let auth = authenticator();
        let unknown = auth.authenticate("mallory@example.com", "wonderland");
        let wrong = auth.authenticate("alice@example.com", "nope");
        assert_eq!(unknown, wrong);
        assert_eq!(unknown, Err(AuthError::BadCredentials));
    }

    #[test]
    fn identifiers_are_matched_exactly() {
        assert_eq!(
            authenticator().authenticate("ALICE@example.com", "wonderland"),
            Err(AuthError::BadCredentials)
        );
    }

    #[test]
    fn disabled_principal_still_authenticates() {
        // Activity is enforced when a token is used, not at login.
        let principal = authenticator()
            .authenticate("bob@example.com", "builder")
            .unwrap();
        assert!(!principal.is_active());
    }

    #[test]
    fn empty_password_is_rejected() {
        assert_eq!(
            authenticator().authenticate("alice@example.com", ""),
            Err(AuthError::BadCredentials)
        );
    }
}
