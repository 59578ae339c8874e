//! Postgres-backed stores.
//!
//! The store traits are synchronous, so each call parks the current worker with
//! `block_in_place` and drives the query on the ambient runtime. That requires
//! a multi-threaded tokio runtime; on a current-thread runtime `block_in_place`
//! panics.

mod credentials;
mod products;

use std::future::Future;

use catalog_core::{DomainError, DomainResult};
use sqlx::PgPool;
use tokio::runtime::Handle;

pub use credentials::PostgresCredentialStore;
pub use products::PostgresProductStore;

const CREATE_PRINCIPALS: &str = r#"
CREATE TABLE IF NOT EXISTS principals (
    identifier    TEXT PRIMARY KEY,
    password_hash TEXT NOT NULL,
    disabled      BOOLEAN NOT NULL DEFAULT FALSE,
    scopes        TEXT[] NOT NULL DEFAULT '{}'
)
"#;

const CREATE_PRODUCTS: &str = r#"
CREATE TABLE IF NOT EXISTS products (
    id       UUID PRIMARY KEY,
    name     TEXT NOT NULL,
    price    BIGINT NOT NULL CHECK (price >= 0),
    in_stock BOOLEAN NOT NULL
)
"#;

/// Create the `principals` and `products` tables if they do not exist.
pub async fn ensure_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::query(CREATE_PRINCIPALS).execute(pool).await?;
    sqlx::query(CREATE_PRODUCTS).execute(pool).await?;
    tracing::info!("database schema ready");
    Ok(())
}

/// Run `fut` to completion from synchronous code inside a tokio runtime.
fn block_on<F, T>(operation: &'static str, fut: F) -> DomainResult<T>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    let handle = Handle::try_current()
        .map_err(|_| DomainError::storage("postgres store used outside a tokio runtime"))?;

    tokio::task::block_in_place(|| handle.block_on(fut)).map_err(|e| {
        tracing::error!(operation, error = %e, "postgres query failed");
        DomainError::storage(format!("{operation} failed"))
    })
}
