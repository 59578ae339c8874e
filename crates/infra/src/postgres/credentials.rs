use catalog_auth::{CredentialStore, PasswordHash, Principal, Scope};
use catalog_core::DomainResult;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};

use super::block_on;
use crate::store::PrincipalStore;

/// Principals table adapter.
#[derive(Debug, Clone)]
pub struct PostgresCredentialStore {
    pool: PgPool,
}

impl PostgresCredentialStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn principal_from_row(row: &PgRow) -> Result<Principal, sqlx::Error> {
    let identifier: String = row.try_get("identifier")?;
    let password_hash: String = row.try_get("password_hash")?;
    let disabled: bool = row.try_get("disabled")?;
    let scopes: Vec<String> = row.try_get("scopes")?;

    Ok(Principal::new(identifier, PasswordHash::from_stored(password_hash))
        .with_disabled(disabled)
        .with_scopes(scopes.into_iter().map(Scope::new)))
}

impl CredentialStore for PostgresCredentialStore {
    /// Lookup failures are logged and reported as "no such principal", which the
    /// auth core turns into a credentials rejection.
    fn find_by_identifier(&self, identifier: &str) -> Option<Principal> {
        let pool = self.pool.clone();
        let identifier = identifier.to_string();

        block_on("find_principal", async move {
            let row = sqlx::query(
                r#"
                SELECT identifier, password_hash, disabled, scopes
                FROM principals
                WHERE identifier = $1
                "#,
            )
            .bind(&identifier)
            .fetch_optional(&pool)
            .await?;

            row.as_ref().map(principal_from_row).transpose()
        })
        .ok()
        .flatten()
    }
}

impl PrincipalStore for PostgresCredentialStore {
    fn upsert(&self, principal: Principal) -> DomainResult<()> {
        let pool = self.pool.clone();
        let scopes: Vec<String> = principal.scopes.iter().map(|s| s.as_str().to_string()).collect();

        block_on("upsert_principal", async move {
            sqlx::query(
                r#"
                INSERT INTO principals (identifier, password_hash, disabled, scopes)
                VALUES ($1, $2, $3, $4)
                ON CONFLICT (identifier)
                DO UPDATE SET
                    password_hash = EXCLUDED.password_hash,
                    disabled = EXCLUDED.disabled,
                    scopes = EXCLUDED.scopes
                "#,
            )
            .bind(&principal.identifier)
            .bind(principal.password_hash.as_str())
            .bind(principal.disabled)
            .bind(&scopes)
            .execute(&pool)
            .await?;
            Ok(())
        })
    }
}
