//! Service wiring: credential store, auth core and product store.

use std::sync::Arc;

use anyhow::Context;
use catalog_auth::{
    AuthConfig, Authenticator, ConfigError, PasswordHasher, Principal, Scope, ScopeAuthorizer,
    TokenCodec,
};
use catalog_infra::{
    InMemoryCredentialStore, InMemoryProductStore, PostgresCredentialStore, PostgresProductStore,
    PrincipalStore, ProductStore, ensure_schema,
};
use sqlx::PgPool;

pub type SharedPrincipals = Arc<dyn PrincipalStore>;
pub type SharedProducts = Arc<dyn ProductStore>;

/// Everything a handler needs, shared across requests behind an `Arc`.
pub struct AppServices {
    pub principals: SharedPrincipals,
    pub authenticator: Authenticator<SharedPrincipals>,
    pub authorizer: ScopeAuthorizer<SharedPrincipals>,
    pub products: SharedProducts,
}

impl AppServices {
    pub fn new(
        config: &AuthConfig,
        principals: SharedPrincipals,
        products: SharedProducts,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let codec = Arc::new(TokenCodec::from_config(config)?);
        let hasher = PasswordHasher::new(config.password_cost)?;

        Ok(Self {
            authenticator: Authenticator::new(principals.clone(), hasher),
            authorizer: ScopeAuthorizer::new(codec, principals.clone()),
            principals,
            products,
        })
    }

    /// In-memory stores (dev/test).
    pub fn in_memory(config: &AuthConfig) -> Result<Self, ConfigError> {
        Self::new(
            config,
            Arc::new(InMemoryCredentialStore::new()),
            Arc::new(InMemoryProductStore::new()),
        )
    }

    /// Postgres stores; creates the tables on first start.
    pub async fn postgres(config: &AuthConfig, database_url: &str) -> anyhow::Result<Self> {
        let pool = PgPool::connect(database_url)
            .await
            .context("failed to connect to Postgres")?;
        ensure_schema(&pool)
            .await
            .context("failed to create database schema")?;

        Ok(Self::new(
            config,
            Arc::new(PostgresCredentialStore::new(pool.clone())),
            Arc::new(PostgresProductStore::new(pool)),
        )?)
    }

    /// Hash `password` and store a principal holding `scopes`, replacing any
    /// existing principal with the same identifier.
    pub fn register_principal(
        &self,
        identifier: &str,
        password: &str,
        scopes: impl IntoIterator<Item = Scope>,
    ) -> anyhow::Result<Principal> {
        let hash = self
            .authenticator
            .hasher()
            .hash(password)
            .context("failed to hash password")?;
        let principal = Principal::new(identifier, hash).with_scopes(scopes);

        self.principals
            .upsert(principal.clone())
            .with_context(|| format!("failed to store principal {identifier}"))?;
        tracing::info!(identifier = %principal.identifier, "principal registered");
        Ok(principal)
    }
}
