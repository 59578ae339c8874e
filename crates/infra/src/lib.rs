//! Infrastructure layer: credential and product storage.
//!
//! Stores expose synchronous traits so the auth core and handlers stay free of
//! async plumbing. The Postgres adapters bridge onto the ambient tokio runtime.

pub mod postgres;
pub mod store;

pub use postgres::{PostgresCredentialStore, PostgresProductStore, ensure_schema};
pub use store::{InMemoryCredentialStore, InMemoryProductStore, PrincipalStore, ProductStore};
