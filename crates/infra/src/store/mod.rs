//! Storage abstractions for principals and products.

mod in_memory;

use std::sync::Arc;

use catalog_auth::{CredentialStore, Principal};
use catalog_core::{DomainResult, ProductId};
use catalog_products::{NewProduct, Product, ProductPatch};

pub use in_memory::{InMemoryCredentialStore, InMemoryProductStore};

/// Credential store that can also register principals.
///
/// The auth core only needs [`CredentialStore`]; provisioning (bootstrap user,
/// admin tooling) goes through this.
pub trait PrincipalStore: CredentialStore {
    /// Insert or replace the principal keyed by its identifier.
    fn upsert(&self, principal: Principal) -> DomainResult<()>;
}

impl<S> PrincipalStore for Arc<S>
where
    S: PrincipalStore + ?Sized,
{
    fn upsert(&self, principal: Principal) -> DomainResult<()> {
        (**self).upsert(principal)
    }
}

/// Product catalog storage.
///
/// `update` and `delete` are single atomic operations: they fail with
/// `DomainError::NotFound` when the id is absent at the moment they run, so
/// callers never look up first and act second. `update` validates the patch
/// before touching storage, so an invalid patch is a validation error whether
/// or not the id exists.
pub trait ProductStore: Send + Sync {
    fn list(&self) -> DomainResult<Vec<Product>>;
    /// Validate and store a new product under a fresh id.
    fn insert(&self, new: NewProduct) -> DomainResult<Product>;
    /// Returns the product as stored after the patch.
    fn update(&self, id: ProductId, patch: &ProductPatch) -> DomainResult<Product>;
    /// Returns the product that was removed.
    fn delete(&self, id: ProductId) -> DomainResult<Product>;
}

impl<S> ProductStore for Arc<S>
where
    S: ProductStore + ?Sized,
{
    fn list(&self) -> DomainResult<Vec<Product>> {
        (**self).list()
    }

    fn insert(&self, new: NewProduct) -> DomainResult<Product> {
        (**self).insert(new)
    }

    fn update(&self, id: ProductId, patch: &ProductPatch) -> DomainResult<Product> {
        (**self).update(id, patch)
    }

    fn delete(&self, id: ProductId) -> DomainResult<Product> {
        (**self).delete(id)
    }
}
