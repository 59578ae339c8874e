use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

use catalog_auth::{CredentialStore, Principal};
use catalog_core::{DomainError, DomainResult, Entity, ProductId};
use catalog_products::{NewProduct, Product, ProductPatch};

use super::{PrincipalStore, ProductStore};

fn poisoned() -> DomainError {
    DomainError::storage("in-memory store lock poisoned")
}

/// In-memory principal registry for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    inner: RwLock<HashMap<String, Principal>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.inner.read().map(|m| m.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl CredentialStore for InMemoryCredentialStore {
    fn find_by_identifier(&self, identifier: &str) -> Option<Principal> {
        let map = self.inner.read().ok()?;
        map.get(identifier).cloned()
    }
}

impl PrincipalStore for InMemoryCredentialStore {
    fn upsert(&self, principal: Principal) -> DomainResult<()> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(principal.identifier.clone(), principal);
        Ok(())
    }
}

/// In-memory product catalog for tests/dev.
///
/// Keyed by `ProductId` (UUIDv7), so listing is roughly creation order.
#[derive(Debug, Default)]
pub struct InMemoryProductStore {
    inner: RwLock<BTreeMap<ProductId, Product>>,
}

impl InMemoryProductStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ProductStore for InMemoryProductStore {
    fn list(&self) -> DomainResult<Vec<Product>> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.values().cloned().collect())
    }

    fn insert(&self, new: NewProduct) -> DomainResult<Product> {
        let product = Product::create(ProductId::new(), new)?;
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let id = *product.id();
        if map.contains_key(&id) {
            return Err(DomainError::conflict(format!("product {id} already exists")));
        }
        map.insert(id, product.clone());
        Ok(product)
    }

    fn update(&self, id: ProductId, patch: &ProductPatch) -> DomainResult<Product> {
        let patch = patch.validated()?;
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let product = map.get_mut(&id).ok_or(DomainError::NotFound)?;
        product.apply_patch(&patch)?;
        Ok(product.clone())
    }

    fn delete(&self, id: ProductId) -> DomainResult<Product> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.remove(&id).ok_or(DomainError::NotFound)
    }
}
